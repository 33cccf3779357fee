//! Storage layer for atomic file operations.

mod atomic_json;
mod suffix;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use suffix::{SUFFIX_LEN, random_suffix};
