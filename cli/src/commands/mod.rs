//! CLI command implementations

pub mod config;
pub mod interactive;
pub mod routes;

pub use config::config_command;
pub use interactive::interactive_command;
pub use routes::routes_command;
