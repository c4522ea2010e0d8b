//! This module contains RTIC tasks for doing various things.
//! Each task is in its own submodule, and is pub(crate) re-exported by this module for usage.
//!

/*
   private interface
*/

/// Edge handlers for both encoders. These run at the highest task priority and never log.
mod exti;

/// Task periodicly writing the encoder counters to the RTT log.
/// Note: this task requires a monotonic clock with at least 1s resolution.
mod periodic_report;

/*
    public(crate) interface
*/
pub(crate) use exti::{exti2, exti3, exti9_5};
pub(crate) use periodic_report::periodic_report;
