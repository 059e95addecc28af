pub mod api;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod keyboard;
pub mod ranking;
pub mod storage;
pub mod timing;
pub mod typist;
// cmd and reports belong to the binary crate (main.rs).

pub use api::{Assistant, Suggestions, DEFAULT_SUGGESTION_LIMIT};
pub use error::{SgResult, SuggesterError};
