pub mod model;
pub mod source;

pub use model::*;
pub use source::PageSource;
