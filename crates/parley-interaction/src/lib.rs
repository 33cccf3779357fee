//! Oracle implementations backed by remote model providers.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiModelOracle, GeminiNamingOracle};
