//! In-memory peripherals for driving the link logic on the host
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use motorlink_core::traits::{Rgb, ServoController, ServoMode, StatusPixel};
use motorlink_hal::{MonotonicClock, PwmOutput, UartRx, UartTx};

/// Clock moved by hand
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn set(&self, now_us: u64) {
        self.now.set(now_us);
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl MonotonicClock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

/// Clock that moves forward on every read
pub struct SteppingClock {
    now: Cell<u64>,
    step: u64,
}

impl SteppingClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl MonotonicClock for SteppingClock {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Link UART with a scripted receive queue and a captured transmit log
#[derive(Default)]
pub struct ScriptedLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub fail_writes: bool,
    /// Every read reports a line error once the queue is empty
    pub fail_reads: bool,
}

impl ScriptedLink {
    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn tx_text(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }

    pub fn tx_lines(&self) -> Vec<String> {
        self.tx_text().lines().map(str::to_owned).collect()
    }
}

impl UartRx for ScriptedLink {
    type Error = ();

    fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
        match self.rx.pop_front() {
            None if self.fail_reads => Err(()),
            byte => Ok(byte),
        }
    }
}

impl UartTx for ScriptedLink {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// PWM bank remembering the last level per GPIO
pub struct RecordingPwm {
    pub levels: [Option<u8>; 30],
    pub writes: usize,
}

impl Default for RecordingPwm {
    fn default() -> Self {
        Self {
            levels: [None; 30],
            writes: 0,
        }
    }
}

impl RecordingPwm {
    pub fn pair(&self, forward: u8, reverse: u8) -> (u8, u8) {
        (
            self.levels[forward as usize].unwrap_or(0),
            self.levels[reverse as usize].unwrap_or(0),
        )
    }
}

impl PwmOutput for RecordingPwm {
    type Error = ();

    fn set_level(&mut self, pin: u8, duty: u8) -> Result<(), ()> {
        *self.levels.get_mut(pin as usize).ok_or(())? = Some(duty);
        self.writes += 1;
        Ok(())
    }
}

/// Status pixel keeping every colour it was sent
#[derive(Default)]
pub struct RecordingPixel {
    pub history: Vec<Rgb>,
}

impl RecordingPixel {
    pub fn last(&self) -> Option<Rgb> {
        self.history.last().copied()
    }
}

impl StatusPixel for RecordingPixel {
    fn show(&mut self, color: Rgb) {
        self.history.push(color);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoCall {
    Range(u8, i16, i16),
    Mode(u8, ServoMode),
    Position(u8, i16),
}

/// Servo controller logging every call
#[derive(Default)]
pub struct RecordingServos {
    pub calls: Vec<ServoCall>,
    pub fail: bool,
}

impl RecordingServos {
    pub fn positions(&self) -> Vec<(u8, i16)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ServoCall::Position(ch, deg) => Some((*ch, *deg)),
                _ => None,
            })
            .collect()
    }
}

impl ServoController for RecordingServos {
    type Error = ();

    fn channel_count(&self) -> u8 {
        16
    }

    fn set_range(&mut self, channel: u8, min_deg: i16, max_deg: i16) -> Result<(), ()> {
        self.calls.push(ServoCall::Range(channel, min_deg, max_deg));
        Ok(())
    }

    fn set_mode(&mut self, channel: u8, mode: ServoMode) -> Result<(), ()> {
        self.calls.push(ServoCall::Mode(channel, mode));
        Ok(())
    }

    fn set_position(&mut self, channel: u8, degrees: i16) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.calls.push(ServoCall::Position(channel, degrees));
        Ok(())
    }
}
