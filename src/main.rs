#![deny(unsafe_code)]
#![no_main]
#![no_std]

use panic_rtt_target as _panic_handler;

/// submodule holding task handlers
mod tasks;

/// encoder wiring on the board
mod board;

/*
 Declare the RTIC application itself.
 Firstly, we must provide it with the path to the device's PAC.
 We also want the device's peripherals, so we request those.
   - RTIC will provde these on the Context object of init.
 Lastly, the report task is a "software task", so we need to donate an unused interrupt to RTIC.
  - this is done via the `dispatchers` argument
*/
#[rtic::app(
    device = stm32f4xx_hal::pac,
    peripherals = true,
    dispatchers=[SPI2],
)]
mod app {
    use dwt_systick_monotonic::DwtSystick;
    use rtic::time::duration::Seconds;
    use rtt_target::{rprintln, rtt_init_print};
    use stm32f4xx_hal::{
        gpio::{
            gpioc::{PC8, PC9},
            Output, PushPull,
        },
        prelude::*,
    };

    use encoder_firmware::{ChannelId, EdgeInterruptRouter, EncoderChannel, EncoderCounts};

    use crate::board::{Channel1Lines, Channel2Lines, ExtiConfig, Led};

    pub(crate) const MONOTONIC_FREQ: u32 = 48_000_000;
    #[monotonic(binds = SysTick, default = true)]
    type SysMono = DwtSystick<MONOTONIC_FREQ>;

    /// how often the counters are written to the RTT log
    pub(crate) const REPORT_PERIOD: Seconds = Seconds(1u32);

    /// Red indicator, lit while channel 1 is being decoded.
    pub(crate) type RedLed = Led<PC8<Output<PushPull>>>;
    /// Green indicator, lit while channel 2 is being decoded.
    pub(crate) type GreenLed = Led<PC9<Output<PushPull>>>;
    /// Left drive encoder, PD2/PD3 on EXTI2 and EXTI3.
    pub(crate) type Encoder1 = EncoderChannel<Channel1Lines, RedLed>;
    /// Right drive encoder, PB5/PB6 on EXTI9_5.
    pub(crate) type Encoder2 = EncoderChannel<Channel2Lines, GreenLed>;

    /* resources shared across RTIC tasks */
    #[shared]
    struct Shared {
        /// written only by the EXTI2 / EXTI3 handlers
        encoder1: Encoder1,
        /// written only by the EXTI9_5 handler
        encoder2: Encoder2,
    }

    /* resources local to specific RTIC tasks */
    #[local]
    struct Local {
        last_report: EncoderCounts,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        // Enable RTT logging
        rtt_init_print!();
        rprintln!("encoder firmware starting");
        // retrieve the RCC register, which is needed to obtain a handle to the clocks
        let rcc = ctx.device.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(MONOTONIC_FREQ.hz()).freeze();

        /* start RTIC monotonics */
        let mut dcb = ctx.core.DCB;
        let dwt = ctx.core.DWT;
        let systick = ctx.core.SYST;
        let mono = DwtSystick::new(&mut dcb, dwt, systick, clocks.sysclk().0);
        /* end RTIC monotonics */

        // obtain the GPIO* register blocks, so we can configure pins on the P* buses.
        let gpiob = ctx.device.GPIOB.split();
        let gpioc = ctx.device.GPIOC.split();
        let gpiod = ctx.device.GPIOD.split();
        let mut syscfg = ctx.device.SYSCFG.constrain();
        let mut exti = ctx.device.EXTI;

        // encoder outputs are open collector, so the inputs need pull-ups.
        let mut channel1 = Channel1Lines::new(
            gpiod.pd2.into_pull_up_input(),
            gpiod.pd3.into_pull_up_input(),
        );
        let mut channel2 = Channel2Lines::new(
            gpiob.pb5.into_pull_up_input(),
            gpiob.pb6.into_pull_up_input(),
        );

        rprintln!("routing encoder edges to EXTI2, EXTI3 and EXTI9_5...");
        EdgeInterruptRouter::initialize(&mut ExtiConfig {
            syscfg: &mut syscfg,
            exti: &mut exti,
            channel1: &mut channel1,
            channel2: &mut channel2,
        })
        .expect("failed to configure encoder interrupts.");

        let red = Led::new(gpioc.pc8.into_push_pull_output());
        let green = Led::new(gpioc.pc9.into_push_pull_output());

        // kick off the periodic task.
        periodic_report::spawn_after(REPORT_PERIOD).expect("failed to kick off periodic task.");
        rprintln!("encoders armed.");
        // lastly return the shared and local resources, as per RTIC's spec.
        (
            Shared {
                encoder1: EncoderChannel::with_indicator(ChannelId::One, channel1, red),
                encoder2: EncoderChannel::with_indicator(ChannelId::Two, channel2, green),
            },
            Local {
                last_report: EncoderCounts::default(),
            },
            init::Monotonics(mono),
        )
    }

    /* bring externed tasks into scope */
    use crate::tasks::{exti2, exti3, exti9_5, periodic_report};

    // RTIC docs specify we can modularize the code by using these `extern` blocks.
    // This allows us to specify the tasks in other modules and still work within
    // RTIC's infrastructure.
    extern "Rust" {
        // channel 1, line A
        #[task(binds = EXTI2, priority = 2, shared = [encoder1])]
        fn exti2(context: exti2::Context);

        // channel 1, line B
        #[task(binds = EXTI3, priority = 2, shared = [encoder1])]
        fn exti3(context: exti3::Context);

        // channel 2, both lines
        #[task(binds = EXTI9_5, priority = 2, shared = [encoder2])]
        fn exti9_5(context: exti9_5::Context);

        // periodic RTT report of the counters
        #[task(priority = 1, shared = [encoder1, encoder2], local = [last_report])]
        fn periodic_report(context: periodic_report::Context);
    }
}
