//! Encoder inputs, indicator LEDs and EXTI plumbing for the STM32F446 board.
//!
//! Channel 1 sits on PD2/PD3 so each line gets its own EXTI vector (EXTI2, EXTI3).
//! Channel 2 sits on PB5/PB6, which share EXTI9_5.

use core::convert::Infallible;

use cortex_m::peripheral::NVIC;
use stm32f4xx_hal::{
    gpio::{
        gpiob::{PB5, PB6},
        gpiod::{PD2, PD3},
        Edge, ExtiPin, Input, PullUp,
    },
    hal::digital::v2::OutputPin,
    pac::{self, Interrupt, EXTI, GPIOB, GPIOD},
    syscfg::SysCfg,
};

use encoder_firmware::{
    ChannelId, EdgeInterruptHal, Indicator, IndicatorColor, InputLine, InterruptSource,
    LineLevels, LineSampler, Phase,
};

/// Channel 1 encoder lines: A on PD2, B on PD3.
pub(crate) struct Channel1Lines {
    a: PD2<Input<PullUp>>,
    b: PD3<Input<PullUp>>,
}

impl Channel1Lines {
    pub(crate) fn new(a: PD2<Input<PullUp>>, b: PD3<Input<PullUp>>) -> Self {
        Self { a, b }
    }

    /// Acknowledges the EXTI line(s) behind `source`.
    pub(crate) fn clear_pending(&mut self, source: InterruptSource) {
        match source {
            InterruptSource::Channel1A => self.a.clear_interrupt_pending_bit(),
            InterruptSource::Channel1B => self.b.clear_interrupt_pending_bit(),
            InterruptSource::Channel2 => {}
        }
    }
}

impl LineSampler for Channel1Lines {
    #[inline]
    #[allow(unsafe_code)]
    fn sample(&mut self) -> LineLevels {
        // SAFETY: atomic read of GPIOD's input data register, no side effects.
        // Both lines come from the same read.
        let idr = unsafe { (*GPIOD::ptr()).idr.read().bits() };
        LineLevels::from_bits((idr >> 2) as u8)
    }
}

/// Channel 2 encoder lines: A on PB5, B on PB6.
pub(crate) struct Channel2Lines {
    a: PB5<Input<PullUp>>,
    b: PB6<Input<PullUp>>,
}

impl Channel2Lines {
    pub(crate) fn new(a: PB5<Input<PullUp>>, b: PB6<Input<PullUp>>) -> Self {
        Self { a, b }
    }

    /// Both lines share EXTI9_5, so both pending bits are acknowledged together.
    pub(crate) fn clear_pending(&mut self, source: InterruptSource) {
        if source == InterruptSource::Channel2 {
            self.a.clear_interrupt_pending_bit();
            self.b.clear_interrupt_pending_bit();
        }
    }
}

impl LineSampler for Channel2Lines {
    #[inline]
    #[allow(unsafe_code)]
    fn sample(&mut self) -> LineLevels {
        // SAFETY: atomic read of GPIOB's input data register, no side effects.
        let idr = unsafe { (*GPIOB::ptr()).idr.read().bits() };
        LineLevels::from_bits((idr >> 5) as u8)
    }
}

/// A diagnostic LED driven from the decode handlers.
pub(crate) struct Led<P> {
    pin: P,
}

impl<P> Led<P>
where
    P: OutputPin,
{
    pub(crate) fn new(mut pin: P) -> Self {
        pin.set_low().ok();
        Self { pin }
    }
}

impl<P> Indicator for Led<P>
where
    P: OutputPin,
{
    #[inline]
    fn set_indicator(&mut self, _color: IndicatorColor, on: bool) {
        if on {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }
}

/// Everything needed to route the encoder pins to EXTI, borrowed for the duration of `init`.
pub(crate) struct ExtiConfig<'a> {
    pub(crate) syscfg: &'a mut SysCfg,
    pub(crate) exti: &'a mut EXTI,
    pub(crate) channel1: &'a mut Channel1Lines,
    pub(crate) channel2: &'a mut Channel2Lines,
}

/// Runs `$body` with `$pin` bound to the GPIO pin behind `$line`.
macro_rules! with_pin {
    ($config:expr, $line:expr, |$pin:ident| $body:expr) => {
        match ($line.channel, $line.phase) {
            (ChannelId::One, Phase::A) => {
                let $pin = &mut $config.channel1.a;
                $body
            }
            (ChannelId::One, Phase::B) => {
                let $pin = &mut $config.channel1.b;
                $body
            }
            (ChannelId::Two, Phase::A) => {
                let $pin = &mut $config.channel2.a;
                $body
            }
            (ChannelId::Two, Phase::B) => {
                let $pin = &mut $config.channel2.b;
                $body
            }
        }
    };
}

impl EdgeInterruptHal for ExtiConfig<'_> {
    type Error = Infallible;

    fn without_interrupts<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        // restores PRIMASK as it was, so this stays disabled when called from `init`
        cortex_m::interrupt::free(|_| f(self))
    }

    fn trigger_on_any_edge(&mut self, line: InputLine) -> Result<(), Infallible> {
        with_pin!(self, line, |pin| pin.trigger_on_edge(self.exti, Edge::RisingFalling));
        Ok(())
    }

    fn enable_line(&mut self, line: InputLine) -> Result<(), Infallible> {
        with_pin!(self, line, |pin| {
            // SYSCFG EXTICR port select, then the EXTI IMR bit
            pin.make_interrupt_source(self.syscfg);
            pin.enable_interrupt(self.exti);
        });
        Ok(())
    }

    fn clear_pending(&mut self, source: InterruptSource) -> Result<(), Infallible> {
        match source.channel() {
            ChannelId::One => self.channel1.clear_pending(source),
            ChannelId::Two => self.channel2.clear_pending(source),
        }
        // a stale NVIC pending bit would fire the handler once right after init
        NVIC::unpend(vector(source));
        Ok(())
    }

    #[allow(unsafe_code)]
    fn enable_source(&mut self, source: InterruptSource) -> Result<(), Infallible> {
        // SAFETY: every vector returned by `vector` is bound to a task in the RTIC app, which
        // unmasks them the same way before `init`.
        unsafe { NVIC::unmask(vector(source)) };
        Ok(())
    }
}

fn vector(source: InterruptSource) -> Interrupt {
    match source {
        InterruptSource::Channel1A => pac::Interrupt::EXTI2,
        InterruptSource::Channel1B => pac::Interrupt::EXTI3,
        InterruptSource::Channel2 => pac::Interrupt::EXTI9_5,
    }
}
