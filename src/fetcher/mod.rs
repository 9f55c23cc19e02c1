pub mod client;
pub mod errors;
pub mod parse;
pub mod pipeline;
pub mod types;

pub use client::{FeedFetcher, HttpFeedFetcher, fetch, get_client};
pub use errors::FetchError;
pub use parse::parse_feed;
pub use types::{Charset, DocumentKind, FetchedDocument};
