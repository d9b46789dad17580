//! Receiver node control loop
//!
//! [`Receiver`] owns everything the receiver needs between iterations: the
//! link UART, the frame reader, the actuator mapper, the status indicator
//! and the clock. The firmware calls [`Receiver::step`] in a tight loop.
//!
//! Each iteration:
//! 1. lets the indicator revert to idle if its hold time has passed
//! 2. takes at most one byte from the link without blocking
//! 3. advances the frame reader, and on a frame event lights the LED,
//!    drives the motors (valid frames only) and writes one diagnostic line
//!    back over the link
//!
//! Every failure is reported to the caller and the next call carries on.

use motorlink_hal::{MonotonicClock, PwmOutput, UartRx, UartTx};
use motorlink_protocol::{CommandVector, Diagnostic, FrameError, FrameReader};

use crate::actuator::ActuatorMapper;
use crate::config::ReceiverConfig;
use crate::indicator::StatusIndicator;
use crate::traits::{Rgb, StatusPixel};

/// Outcome of one frame on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Valid frame, commands applied
    Accepted(CommandVector),
    /// Frame dropped
    Rejected(FrameError),
}

/// Hardware failures inside a loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverError {
    /// Reading the link UART failed
    LinkRead,
    /// Writing the diagnostic line failed
    Diagnostic,
    /// Writing a duty register failed
    Output,
}

/// Receiver loop context
pub struct Receiver<U, P, L, C>
where
    U: UartRx + UartTx,
    P: PwmOutput,
    L: StatusPixel,
    C: MonotonicClock,
{
    link: U,
    reader: FrameReader,
    mapper: ActuatorMapper<P>,
    indicator: StatusIndicator<L>,
    clock: C,
    drive_outputs: bool,
    accepted: u32,
    rejected: u32,
}

impl<U, P, L, C> Receiver<U, P, L, C>
where
    U: UartRx + UartTx,
    P: PwmOutput,
    L: StatusPixel,
    C: MonotonicClock,
{
    /// Assemble the receiver from its peripherals
    ///
    /// The indicator switches to the idle colour immediately.
    pub fn new(link: U, pwm: P, pixel: L, clock: C, config: &ReceiverConfig) -> Self {
        Self {
            link,
            reader: FrameReader::with_timeout(config.link.frame_timeout_us()),
            mapper: ActuatorMapper::new(pwm, config.channels),
            indicator: StatusIndicator::with_hold(pixel, config.link.indicator_hold_us()),
            clock,
            drive_outputs: config.drive_outputs,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Put every motor channel at rest
    pub fn start(&mut self) -> Result<(), ReceiverError> {
        if self.drive_outputs {
            self.mapper.stop_all().map_err(|_| ReceiverError::Output)?;
        }
        Ok(())
    }

    /// Run one loop iteration
    ///
    /// Returns the frame event this iteration produced, if any. A failed
    /// read still closes an expired frame window; the timeout is returned
    /// in place of [`ReceiverError::LinkRead`] for that iteration.
    pub fn step(&mut self) -> Result<Option<LinkEvent>, ReceiverError> {
        let now = self.clock.now_us();
        self.indicator.poll(now);

        let byte = match self.link.try_read_byte() {
            Ok(byte) => byte,
            Err(_) => {
                return match self.reader.poll(now, None) {
                    Some(outcome) => self.handle_outcome(outcome, now).map(Some),
                    None => Err(ReceiverError::LinkRead),
                };
            }
        };

        match self.reader.poll(now, byte) {
            Some(outcome) => self.handle_outcome(outcome, now).map(Some),
            None => Ok(None),
        }
    }

    fn handle_outcome(
        &mut self,
        outcome: Result<CommandVector, FrameError>,
        now: u64,
    ) -> Result<LinkEvent, ReceiverError> {
        let event = match outcome {
            Ok(commands) => {
                self.accepted = self.accepted.wrapping_add(1);
                self.indicator.trigger(Rgb::GOOD, now);
                LinkEvent::Accepted(commands)
            }
            Err(error) => {
                self.rejected = self.rejected.wrapping_add(1);
                self.indicator.trigger(Rgb::ERROR, now);
                LinkEvent::Rejected(error)
            }
        };

        let line = Diagnostic::from_outcome(&outcome).to_line();
        let reported = self
            .link
            .write_blocking(line.as_bytes())
            .map_err(|_| ReceiverError::Diagnostic);

        if let (true, Ok(commands)) = (self.drive_outputs, outcome) {
            self.mapper
                .apply(&commands)
                .map_err(|_| ReceiverError::Output)?;
        }

        reported.map(|_| event)
    }

    /// Frames accepted since boot
    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Frames rejected since boot
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    pub fn indicator(&self) -> &StatusIndicator<L> {
        &self.indicator
    }

    pub fn mapper(&self) -> &ActuatorMapper<P> {
        &self.mapper
    }

    pub fn link(&self) -> &U {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut U {
        &mut self.link
    }
}
