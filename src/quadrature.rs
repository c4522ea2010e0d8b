/// Levels of the two lines of one quadrature pair, sampled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLevels {
    pub a: bool,
    pub b: bool,
}

impl LineLevels {
    /// The four states in Gray-code order, as (A, B). Walking this cycle forwards counts up.
    pub const GRAY_CYCLE: [LineLevels; 4] = [
        LineLevels::new(false, false),
        LineLevels::new(false, true),
        LineLevels::new(true, true),
        LineLevels::new(true, false),
    ];

    pub const fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// bit 0 is line A, bit 1 is line B. Higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            a: bits & 0b01 != 0,
            b: bits & 0b10 != 0,
        }
    }

    pub const fn bits(self) -> u8 {
        (self.a as u8) | ((self.b as u8) << 1)
    }
}

/// Outcome of a single decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// amount added to the position, before wrapping
    pub delta: i8,
    /// both lines changed since the previous sample
    pub inconsistent: bool,
}

/// Decode state and counters of one encoder.
///
/// The edge handler of the channel is the only writer. `position` wraps at the `i8`
/// boundary and `error_count` at the `u32` boundary; neither is ever corrected or reset here.
#[derive(Debug, Clone, Default)]
pub struct QuadratureChannel {
    previous: LineLevels,
    position: i8,
    error_count: u32,
}

impl QuadratureChannel {
    pub const fn new() -> Self {
        Self {
            previous: LineLevels::new(false, false),
            position: 0,
            error_count: 0,
        }
    }

    /// Applies one sample to the channel.
    ///
    /// The delta `(prevA ^ curB) - (curA ^ prevB)` is added even when both lines moved.
    /// In that case the step is counted as an error; the formula then always yields 0.
    #[inline]
    pub fn decode(&mut self, current: LineLevels) -> Transition {
        let previous = self.previous;
        let delta = (previous.a ^ current.b) as i8 - (current.a ^ previous.b) as i8;
        self.position = self.position.wrapping_add(delta);

        let inconsistent = (previous.a ^ current.a) & (previous.b ^ current.b);
        if inconsistent {
            self.error_count = self.error_count.wrapping_add(1);
        }

        self.previous = current;
        Transition { delta, inconsistent }
    }

    pub fn position(&self) -> i8 {
        self.position
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// the levels recorded by the last decode step
    pub fn previous(&self) -> LineLevels {
        self.previous
    }

    pub fn counts(&self) -> crate::ChannelCounts {
        crate::ChannelCounts {
            position: self.position,
            errors: self.error_count,
        }
    }

    /// Seeds the counters, for exercising the wrap boundaries.
    #[cfg(test)]
    pub(crate) fn with_counts(position: i8, error_count: u32) -> Self {
        Self {
            previous: LineLevels::default(),
            position,
            error_count,
        }
    }
}
