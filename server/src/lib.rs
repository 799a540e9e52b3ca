//! HTTP front end for the FAQ semantic search service.
//!
//! The listener comes up immediately; the search service is built in the
//! background by [`startup::populate`] and answers `503` until it is ready.

pub mod cli;
pub mod config;
pub mod routes;
pub mod startup;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::router;
