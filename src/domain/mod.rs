pub mod card;
pub mod review;

pub use card::{Card, CardType, Maturity};
pub use review::{ReviewEvent, ReviewQuality};
