//! Utilities
//!
//! - [`error`]: unified `AppError` / `AppResponse` types
//! - [`logger`]: tracing setup
//! - [`time`]: local calendar-day handling

pub mod error;
pub mod logger;
pub mod time;

pub use error::{ok, AppError, AppResponse, AppResult};
