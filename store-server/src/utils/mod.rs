//! Utility module - common helpers and types
//!
//! # Contents
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API response envelope
//! - logger, time and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
