//! Caller identity.
//!
//! Authentication happens upstream; requests arrive with the user id the
//! gateway resolved.

pub mod middleware;

pub use middleware::{AuthContext, USER_ID_HEADER};
