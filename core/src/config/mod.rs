//! Configuration module for GoldRadar core
//!
//! Only exports pure data types. All discovery and loading logic is in the CLI layer.

pub mod types;

pub use types::RouterConfig;
