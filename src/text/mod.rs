pub mod compact;
pub mod normalize;

pub use compact::{CompactOptions, compact, compact_with};
pub use normalize::{normalize_optional, normalize_text};
