//! Presentation adapters

pub mod terminal;
