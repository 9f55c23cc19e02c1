pub mod news;

pub use news::{NewsFilter, NewsStore, PgNewsRepository};
