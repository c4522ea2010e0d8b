use serde::Serialize;

/// Counters of one channel, copied out in one go.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelCounts {
    /// cumulative ticks, wraps at the `i8` boundary
    pub position: i8,
    /// transitions where both lines changed at once, wraps at the `u32` boundary
    pub errors: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderCounts {
    pub channel1: ChannelCounts,
    pub channel2: ChannelCounts,
}

impl ChannelCounts {
    /// Number of decode errors recorded since `earlier`, accounting for wraparound.
    pub fn errors_since(&self, earlier: &ChannelCounts) -> u32 {
        self.errors.wrapping_sub(earlier.errors)
    }

    /// Ticks moved since `earlier`.
    ///
    /// Only meaningful if fewer than 128 ticks happened in between.
    pub fn ticks_since(&self, earlier: &ChannelCounts) -> i8 {
        self.position.wrapping_sub(earlier.position)
    }
}
