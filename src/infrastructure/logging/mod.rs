//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Channel-style `[timestamp] [level] message` lines
//! - JSON and pretty console formats
//! - Rolling log files through tracing-appender

pub mod channel_format;
pub mod config;
pub mod logger;

pub use channel_format::ChannelFormat;
pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
