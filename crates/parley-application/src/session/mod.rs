//! Session orchestration for the transport layer.
//!
//! - `manager`: Serializes turns on the active session (`SessionManager`)
//! - `factory`: Wires a manager from configuration (`SessionFactory`)

mod factory;
mod manager;

pub use factory::SessionFactory;
pub use manager::SessionManager;
