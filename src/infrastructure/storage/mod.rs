//! Page and release sources backed by memory or local JSON files

pub mod json_file;
pub mod memory;

pub use json_file::{JsonFilePageSource, JsonFileReleaseSource};
pub use memory::InMemoryPageSource;
