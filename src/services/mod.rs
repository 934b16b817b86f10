//! Application services.
//!
//! Orchestrates the store and the scheduling core so handlers stay thin.

pub mod study;
