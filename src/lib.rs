pub mod constants;
pub mod env_state;
pub mod ephemerist;
pub mod ephemerist_errors;
pub mod fetcher;
pub mod grid;
pub mod parser;
pub mod query;
pub mod range_hint;
mod scheduler;
pub mod series;
pub mod service;
pub mod time;
