#![cfg_attr(not(test), no_std)]
//! Interrupt-driven quadrature decoding for the two drive encoders.
//!
//! The decode core lives here and is free of any board specifics, so it runs on the host
//! under test. The RTIC application in `main.rs` binds it to the EXTI interrupts.

/// counter snapshots and error types
pub mod datamodel;

/// The quadrature decode step and per-channel state.
pub mod quadrature;

/// Edge handler for one encoder channel, plus the sampler / indicator seams.
pub mod channel;

/// One-time edge interrupt configuration.
pub mod router;

/// Routing of interrupt sources to the edge callbacks.
pub mod dispatch;

pub use channel::{ChannelId, EncoderChannel, Indicator, IndicatorColor, LineSampler, NoIndicator};
pub use datamodel::{ChannelCounts, ConfigError, EncoderCounts};
pub use dispatch::{dispatch, EdgeCallback, Encoders};
pub use quadrature::{LineLevels, QuadratureChannel, Transition};
pub use router::{EdgeInterruptHal, EdgeInterruptRouter, InputLine, InterruptSource, Phase, Route};
