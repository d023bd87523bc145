//! Infrastructure layer - concrete page and release sources

pub mod storage;

pub use storage::{InMemoryPageSource, JsonFilePageSource, JsonFileReleaseSource};
