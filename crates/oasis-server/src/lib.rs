pub mod config;
pub mod flow;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod templates;
pub mod tokens;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use observability::{init_tracing, shutdown_tracing};
pub use server::{OasisServer, ServerBuilder, build_app, build_endpoint};
pub use tokens::{InMemoryTokenStorage, UuidTokenFactory};
