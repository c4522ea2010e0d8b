use crate::datamodel::ChannelCounts;
use crate::quadrature::{LineLevels, QuadratureChannel, Transition};

/// Which of the two drive encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    One,
    Two,
}

impl ChannelId {
    pub const ALL: [ChannelId; 2] = [ChannelId::One, ChannelId::Two];

    /// the indicator lit while this channel's edge handler runs
    pub const fn indicator_color(self) -> IndicatorColor {
        match self {
            ChannelId::One => IndicatorColor::Red,
            ChannelId::Two => IndicatorColor::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Red,
    Green,
}

/// Reads both lines of one quadrature pair.
///
/// Implementations must take both levels from a single read of the input register, so
/// that A and B describe the same instant.
pub trait LineSampler {
    fn sample(&mut self) -> LineLevels;
}

/// Diagnostic light toggled around every decode step.
///
/// Called from interrupt context, so it has to be a couple of register writes at most.
pub trait Indicator {
    fn set_indicator(&mut self, color: IndicatorColor, on: bool);
}

/// Indicator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    #[inline(always)]
    fn set_indicator(&mut self, _color: IndicatorColor, _on: bool) {}
}

impl<F> LineSampler for F
where
    F: FnMut() -> LineLevels,
{
    fn sample(&mut self) -> LineLevels {
        self()
    }
}

/// One encoder: its decode state plus the hardware needed to service its edges.
pub struct EncoderChannel<S, I = NoIndicator> {
    id: ChannelId,
    decoder: QuadratureChannel,
    sampler: S,
    indicator: I,
}

impl<S> EncoderChannel<S, NoIndicator>
where
    S: LineSampler,
{
    pub fn new(id: ChannelId, sampler: S) -> Self {
        Self::with_indicator(id, sampler, NoIndicator)
    }
}

impl<S, I> EncoderChannel<S, I>
where
    S: LineSampler,
    I: Indicator,
{
    pub fn with_indicator(id: ChannelId, sampler: S, indicator: I) -> Self {
        Self {
            id,
            decoder: QuadratureChannel::new(),
            sampler,
            indicator,
        }
    }

    /// Services one edge on either line of this channel.
    ///
    /// Runs to completion and cannot fail. Edges that arrive while this runs, or while
    /// interrupts are masked, are lost without a trace.
    #[inline]
    pub fn on_edge(&mut self) -> Transition {
        let color = self.id.indicator_color();
        self.indicator.set_indicator(color, true);
        let levels = self.sampler.sample();
        let transition = self.decoder.decode(levels);
        self.indicator.set_indicator(color, false);
        transition
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn counts(&self) -> ChannelCounts {
        self.decoder.counts()
    }

    pub fn decoder(&self) -> &QuadratureChannel {
        &self.decoder
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }
}
