//! Application layer for Parley.
//!
//! This crate coordinates the domain session with its store and oracles and
//! translates domain failures into client-facing errors.

pub mod error;
pub mod session;

pub use error::{ApiError, ErrorCode};
pub use session::{SessionFactory, SessionManager};
