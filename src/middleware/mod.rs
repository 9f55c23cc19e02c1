pub mod rate_limit;

pub use rate_limit::{Decision, RateLimit, rate_limit_middleware};
