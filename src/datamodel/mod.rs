//! Plain data shared between the decode core and whoever consumes the counters.

/// snapshot of the counters
pub mod counts;

/// edge interrupt configuration failures
pub mod config_error;

pub use config_error::ConfigError;
pub use counts::{ChannelCounts, EncoderCounts};
