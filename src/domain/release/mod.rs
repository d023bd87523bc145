pub mod model;
pub mod source;
pub mod version;

pub use model::{is_update_available, NetbirdRelease};
pub use source::ReleaseSource;
pub use version::{compare_versions, ordering_sign, parse_version, ParseError, Version};
