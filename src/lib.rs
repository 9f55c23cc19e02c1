pub mod admin;
pub mod app_state;
pub mod brands;
pub mod category;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod ingest;
pub mod middleware;
pub mod news;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub mod text;
pub mod tone;
