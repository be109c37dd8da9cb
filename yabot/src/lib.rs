//! An IRC bot that reports the crawl rate of a YaCy peer.
pub mod command;
pub mod config;
pub mod consts;
pub mod context;
mod error;
pub mod http;
pub mod plugin;
pub mod tracing;
mod yabot;

pub use config::Config;
pub use context::Context;
pub use error::Error;
pub use plugin::{Plugin, Propagation, Registry};
pub use yabot::Yabot;
