use crate::channel::{ChannelId, EncoderChannel, Indicator, LineSampler};
use crate::datamodel::EncoderCounts;
use crate::router::InterruptSource;

/// Receiver of edge events, one call per serviced interrupt.
pub trait EdgeCallback {
    fn on_edge_event(&mut self, channel: ChannelId);
}

impl<S, I> EdgeCallback for EncoderChannel<S, I>
where
    S: LineSampler,
    I: Indicator,
{
    /// Events addressed to the other channel are ignored.
    fn on_edge_event(&mut self, channel: ChannelId) {
        if channel == self.id() {
            self.on_edge();
        }
    }
}

/// Both drive encoders behind one callback.
pub struct Encoders<C1, C2> {
    pub channel1: C1,
    pub channel2: C2,
}

impl<S1, I1, S2, I2> Encoders<EncoderChannel<S1, I1>, EncoderChannel<S2, I2>>
where
    S1: LineSampler,
    I1: Indicator,
    S2: LineSampler,
    I2: Indicator,
{
    pub fn new(channel1: EncoderChannel<S1, I1>, channel2: EncoderChannel<S2, I2>) -> Self {
        debug_assert_eq!(channel1.id(), ChannelId::One);
        debug_assert_eq!(channel2.id(), ChannelId::Two);
        Self { channel1, channel2 }
    }

    pub fn counts(&self) -> EncoderCounts {
        EncoderCounts {
            channel1: self.channel1.counts(),
            channel2: self.channel2.counts(),
        }
    }
}

impl<C1, C2> EdgeCallback for Encoders<C1, C2>
where
    C1: EdgeCallback,
    C2: EdgeCallback,
{
    fn on_edge_event(&mut self, channel: ChannelId) {
        match channel {
            ChannelId::One => self.channel1.on_edge_event(channel),
            ChannelId::Two => self.channel2.on_edge_event(channel),
        }
    }
}

/// Hands a fired interrupt source to the callback, tagged with the channel it serves.
#[inline]
pub fn dispatch<C>(source: InterruptSource, callback: &mut C)
where
    C: EdgeCallback + ?Sized,
{
    callback.on_edge_event(source.channel());
}
