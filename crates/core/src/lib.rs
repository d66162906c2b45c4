//! Shared configuration for the rulebox engine and its command-line front end.

pub mod config;

pub use config::{load_dotenv, Config, EvalConfig, RuntimeConfig};
