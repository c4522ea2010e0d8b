//! A software stand-in for the edge interrupt hardware.
//!
//! Lines change level through [`SimBoard::set_line`]; an enabled, edge-triggered line
//! latches a pending flag on its source. [`SimBoard::service`] then delivers every pending,
//! unmasked source once, the way the NVIC would when interrupts are enabled. Repeated edges
//! on a source before it is serviced coalesce into a single delivery.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use encoder_firmware::{
    dispatch, ChannelId, EdgeCallback, EdgeInterruptHal, InputLine, InterruptSource, LineLevels,
    Phase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalFault;

pub struct SimBoard {
    levels: [Rc<Cell<LineLevels>>; 2],
    interrupts_enabled: bool,
    any_edge: HashSet<InputLine>,
    lines_enabled: HashSet<InputLine>,
    sources_enabled: HashSet<InterruptSource>,
    pending: HashSet<InterruptSource>,
    /// every source delivered by `service`, in order
    pub delivered: Vec<InterruptSource>,
    /// makes `enable_source` fail for this source
    pub fail_source: Option<InterruptSource>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self {
            levels: [Rc::default(), Rc::default()],
            // global delivery is on at reset, as on the real part after `init`
            interrupts_enabled: true,
            any_edge: HashSet::new(),
            lines_enabled: HashSet::new(),
            sources_enabled: HashSet::new(),
            pending: HashSet::new(),
            delivered: Vec::new(),
            fail_source: None,
        }
    }
}

fn index(channel: ChannelId) -> usize {
    match channel {
        ChannelId::One => 0,
        ChannelId::Two => 1,
    }
}

impl SimBoard {
    /// A sampler reading both lines of `channel` at once.
    pub fn sampler(&self, channel: ChannelId) -> impl FnMut() -> LineLevels {
        let levels = Rc::clone(&self.levels[index(channel)]);
        move || levels.get()
    }

    pub fn levels(&self, channel: ChannelId) -> LineLevels {
        self.levels[index(channel)].get()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    pub fn is_pending(&self, source: InterruptSource) -> bool {
        self.pending.contains(&source)
    }

    /// Drives one line, latching a pending flag if that is an edge the hardware watches.
    pub fn set_line(&mut self, line: InputLine, high: bool) {
        let cell = &self.levels[index(line.channel)];
        let mut levels = cell.get();
        let level = match line.phase {
            Phase::A => &mut levels.a,
            Phase::B => &mut levels.b,
        };
        if *level == high {
            return;
        }
        *level = high;
        cell.set(levels);

        if self.any_edge.contains(&line) && self.lines_enabled.contains(&line) {
            self.pending.insert(InterruptSource::of(line));
        }
    }

    pub fn toggle_line(&mut self, line: InputLine) {
        let levels = self.levels(line.channel);
        let high = match line.phase {
            Phase::A => levels.a,
            Phase::B => levels.b,
        };
        self.set_line(line, !high);
    }

    /// Moves `channel` to `target`, one line at a time if both differ.
    pub fn drive(&mut self, channel: ChannelId, target: LineLevels) {
        self.set_line(InputLine::new(channel, Phase::A), target.a);
        self.set_line(InputLine::new(channel, Phase::B), target.b);
    }

    /// Latches a pending flag as if noise had triggered `source` before configuration.
    pub fn inject_pending(&mut self, source: InterruptSource) {
        self.pending.insert(source);
    }

    /// Delivers every pending, unmasked source once. Returns how many were delivered.
    pub fn service<C>(&mut self, callback: &mut C) -> usize
    where
        C: EdgeCallback,
    {
        if !self.interrupts_enabled {
            return 0;
        }
        let mut count = 0;
        for source in InterruptSource::ALL {
            if self.sources_enabled.contains(&source) && self.pending.remove(&source) {
                self.delivered.push(source);
                dispatch(source, callback);
                count += 1;
            }
        }
        count
    }

    /// Applies `edges` to one line, servicing after each edge.
    pub fn pulse<C>(&mut self, line: InputLine, edges: usize, callback: &mut C)
    where
        C: EdgeCallback,
    {
        for _ in 0..edges {
            self.toggle_line(line);
            self.service(callback);
        }
    }
}

impl EdgeInterruptHal for SimBoard {
    type Error = HalFault;

    fn without_interrupts<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let was_enabled = self.interrupts_enabled;
        self.interrupts_enabled = false;
        let r = f(self);
        self.interrupts_enabled = was_enabled;
        r
    }

    fn trigger_on_any_edge(&mut self, line: InputLine) -> Result<(), HalFault> {
        assert!(!self.interrupts_enabled, "edge select with interrupts live");
        self.any_edge.insert(line);
        Ok(())
    }

    fn enable_line(&mut self, line: InputLine) -> Result<(), HalFault> {
        assert!(!self.interrupts_enabled, "line enable with interrupts live");
        self.lines_enabled.insert(line);
        Ok(())
    }

    fn clear_pending(&mut self, source: InterruptSource) -> Result<(), HalFault> {
        self.pending.remove(&source);
        Ok(())
    }

    fn enable_source(&mut self, source: InterruptSource) -> Result<(), HalFault> {
        if self.fail_source == Some(source) {
            return Err(HalFault);
        }
        self.sources_enabled.insert(source);
        Ok(())
    }
}

pub type SimChannel = encoder_firmware::EncoderChannel<Box<dyn FnMut() -> LineLevels>>;

/// Both encoders, sampling from `board`.
pub fn encoders(board: &SimBoard) -> encoder_firmware::Encoders<SimChannel, SimChannel> {
    encoder_firmware::Encoders::new(
        SimChannel::new(ChannelId::One, Box::new(board.sampler(ChannelId::One))),
        SimChannel::new(ChannelId::Two, Box::new(board.sampler(ChannelId::Two))),
    )
}

/// Walks `channel` `steps` positions along the Gray cycle (backwards for negative steps),
/// servicing after each edge.
pub fn walk<C>(board: &mut SimBoard, channel: ChannelId, steps: i32, callback: &mut C)
where
    C: EdgeCallback,
{
    let cycle = LineLevels::GRAY_CYCLE;
    let mut at = cycle
        .iter()
        .position(|levels| *levels == board.levels(channel))
        .expect("channel levels are always on the cycle") as i32;
    for _ in 0..steps.abs() {
        at = (at + steps.signum()).rem_euclid(4);
        board.drive(channel, cycle[at as usize]);
        board.service(callback);
    }
}
