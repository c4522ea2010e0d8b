use crate::channel::ChannelId;
use crate::datamodel::ConfigError;

/// Line of a quadrature pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    A,
    B,
}

/// One physical encoder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLine {
    pub channel: ChannelId,
    pub phase: Phase,
}

impl InputLine {
    pub const fn new(channel: ChannelId, phase: Phase) -> Self {
        Self { channel, phase }
    }
}

/// Hardware interrupt sources used by the encoders.
///
/// Channel 1 gets one source per line so its handler stays minimal; both lines of
/// channel 2 share a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    Channel1A,
    Channel1B,
    Channel2,
}

impl InterruptSource {
    pub const ALL: [InterruptSource; 3] = [
        InterruptSource::Channel1A,
        InterruptSource::Channel1B,
        InterruptSource::Channel2,
    ];

    /// the channel whose handler this source triggers
    pub const fn channel(self) -> ChannelId {
        match self {
            InterruptSource::Channel1A | InterruptSource::Channel1B => ChannelId::One,
            InterruptSource::Channel2 => ChannelId::Two,
        }
    }

    /// the source an input line is wired to
    pub const fn of(line: InputLine) -> Self {
        match (line.channel, line.phase) {
            (ChannelId::One, Phase::A) => InterruptSource::Channel1A,
            (ChannelId::One, Phase::B) => InterruptSource::Channel1B,
            (ChannelId::Two, _) => InterruptSource::Channel2,
        }
    }
}

/// Pairing of an input line with the interrupt source it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub line: InputLine,
    pub source: InterruptSource,
}

impl Route {
    const fn of(channel: ChannelId, phase: Phase) -> Self {
        let line = InputLine::new(channel, phase);
        Self {
            line,
            source: InterruptSource::of(line),
        }
    }
}

/// The control bits the router needs from the interrupt hardware.
///
/// Every operation must be idempotent: applying the same setting twice leaves the
/// hardware exactly as applying it once.
pub trait EdgeInterruptHal {
    type Error;

    /// Runs `f` with global interrupt delivery disabled, restoring it afterwards.
    fn without_interrupts<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R;

    /// Selects triggering on both rising and falling edges for `line`.
    fn trigger_on_any_edge(&mut self, line: InputLine) -> Result<(), Self::Error>;

    /// Lets `line` raise its interrupt source.
    fn enable_line(&mut self, line: InputLine) -> Result<(), Self::Error>;

    /// Drops any stale pending flag of `source`.
    fn clear_pending(&mut self, source: InterruptSource) -> Result<(), Self::Error>;

    /// Unmasks `source`.
    fn enable_source(&mut self, source: InterruptSource) -> Result<(), Self::Error>;
}

/// Binds the encoder inputs to their edge interrupt sources.
pub struct EdgeInterruptRouter;

impl EdgeInterruptRouter {
    /// Channel 2 is configured first, then channel 1.
    pub const ROUTES: [Route; 4] = [
        Route::of(ChannelId::Two, Phase::A),
        Route::of(ChannelId::Two, Phase::B),
        Route::of(ChannelId::One, Phase::A),
        Route::of(ChannelId::One, Phase::B),
    ];

    /// Configures all encoder interrupts and unmasks them.
    ///
    /// Runs entirely with global interrupts disabled. Calling it again re-applies the same
    /// configuration. On failure the remaining steps are skipped, interrupt delivery is
    /// still restored, and the error is handed back for the caller to treat as fatal.
    pub fn initialize<H>(hal: &mut H) -> Result<(), ConfigError<H::Error>>
    where
        H: EdgeInterruptHal,
    {
        hal.without_interrupts(|hal| -> Result<(), ConfigError<H::Error>> {
            Self::configure(hal, ChannelId::Two)?;
            Self::configure(hal, ChannelId::One)?;
            for source in InterruptSource::ALL {
                hal.enable_source(source)
                    .map_err(|error| ConfigError::SourceEnable { source, error })?;
            }
            Ok(())
        })
    }

    fn configure<H>(hal: &mut H, channel: ChannelId) -> Result<(), ConfigError<H::Error>>
    where
        H: EdgeInterruptHal,
    {
        let routes = Self::ROUTES.iter().filter(|route| route.line.channel == channel);
        for route in routes.clone() {
            let line = route.line;
            hal.trigger_on_any_edge(line)
                .map_err(|error| ConfigError::EdgeSelect { line, error })?;
            hal.enable_line(line)
                .map_err(|error| ConfigError::LineEnable { line, error })?;
        }
        // channel 2's lines share a source; clear it once
        let mut cleared: Option<InterruptSource> = None;
        for route in routes {
            if cleared == Some(route.source) {
                continue;
            }
            let source = route.source;
            hal.clear_pending(source)
                .map_err(|error| ConfigError::PendingClear { source, error })?;
            cleared = Some(source);
        }
        Ok(())
    }
}
