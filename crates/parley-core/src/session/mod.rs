//! Session domain module.
//!
//! This module contains the conversation session, its message types, the
//! record store interface, the oracle contracts and the naming policy.
//!
//! # Module Structure
//!
//! - `message`: Message value and role tags (`Message`, `Role`)
//! - `history`: System-headed message list (`History`)
//! - `oracle`: Model and naming oracle contracts (`ModelOracle`, `NamingOracle`)
//! - `repository`: Record persistence interface (`RecordStore`, `RecordHandle`)
//! - `naming`: When and how a record gets its name (`NamingPolicy`)
//! - `model`: The active session (`Session`)
//!
//! # Usage
//!
//! ```ignore
//! use parley_core::session::{Session, NamingPolicy, RecordStore};
//! use parley_core::session::{Message, Role};
//! ```

mod history;
mod message;
mod model;
mod naming;
mod oracle;
mod repository;

// Re-export public API
pub use history::History;
pub use message::{Message, Role};
pub use model::Session;
pub use naming::{DEFAULT_MAX_NAME_LEN, NamingOutcome, NamingPolicy, NamingState, normalize_name};
pub use oracle::{ModelOracle, NamingOracle, OracleError};
pub use repository::{RecordHandle, RecordStore};
