use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drillcards::{config::Settings, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "drillcards=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");
  let app = handlers::router(AppState::new(pool, settings.study));

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
