//! Sender node logic
//!
//! The sender turns operator lines into motor frames and local servo
//! moves. After each frame it optionally waits for the receiver's echo
//! line and reports it; the echo never changes what is sent next.

pub mod console;
pub mod echo;
pub mod input;

use core::fmt;

use motorlink_hal::{MonotonicClock, UartRx, UartTx};
use motorlink_protocol::{encode, CommandVector, Frame};

use crate::config::{SenderConfig, SERVO_COUNT};
use crate::traits::ServoController;

pub use console::{read_line, UartWriter, BANNER, CONSOLE_LINE_LEN};
pub use echo::{wait_for_echo, Echo, ECHO_CAPACITY, ECHO_TIMEOUT_US};
pub use input::{
    clamp_servo, parse_command_line, InputError, OperatorCommand, ServoCommandVector,
    SERVO_LIMIT_DEG,
};

/// Sender-side errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenderError {
    /// Console line rejected
    InputParse(InputError),
    /// No echo arrived within the timeout
    NoAcknowledgement,
    /// Link UART read or write failed
    Link,
    /// Servo controller rejected a command
    Servo,
}

impl From<InputError> for SenderError {
    fn from(error: InputError) -> Self {
        SenderError::InputParse(error)
    }
}

/// What one console line did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub command: OperatorCommand,
    /// Frame written to the link
    pub frame: Option<Frame>,
    /// Echo outcome, when an echo was waited for
    pub echo: Option<Result<Echo, SenderError>>,
    /// Servo positions written to the controller
    pub servos_applied: Option<ServoCommandVector>,
}

impl Report {
    /// Print the operator-facing summary
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        if let Some(motors) = self.command.motors() {
            out.write_str("Motors:")?;
            for value in motors {
                write!(out, " {}", value)?;
            }
            out.write_str("\r\n")?;
        }

        match &self.echo {
            Some(Ok(echo)) => write!(out, "Echo: {}\r\n", echo.as_str())?,
            Some(Err(_)) => out.write_str("No slave response\r\n")?,
            None => {}
        }

        match (self.command.servos(), self.servos_applied) {
            (_, Some(servos)) => {
                out.write_str("Servos:")?;
                for value in servos {
                    write!(out, " {}", value)?;
                }
                out.write_str("\r\n")?;
            }
            (Some(_), None) => out.write_str("Servos: disabled\r\n")?,
            (None, None) => {}
        }
        Ok(())
    }
}

/// Sender loop context
pub struct Sender<U, S, C>
where
    U: UartRx + UartTx,
    S: ServoController,
    C: MonotonicClock,
{
    link: U,
    servos: Option<S>,
    clock: C,
    config: SenderConfig,
}

impl<U, S, C> Sender<U, S, C>
where
    U: UartRx + UartTx,
    S: ServoController,
    C: MonotonicClock,
{
    /// Assemble the sender; pass `None` for a node without servos
    pub fn new(link: U, servos: Option<S>, clock: C, config: SenderConfig) -> Self {
        let servos = if config.servos.enabled { servos } else { None };
        Self {
            link,
            servos,
            clock,
            config,
        }
    }

    /// Configure every servo channel and centre it
    pub fn start(&mut self) -> Result<(), SenderError> {
        let settings = self.config.servos;
        let Some(controller) = self.servos.as_mut() else {
            return Ok(());
        };
        for index in 0..SERVO_COUNT {
            let channel = settings.channel(index);
            controller
                .set_range(channel, settings.min_degrees, settings.max_degrees)
                .map_err(|_| SenderError::Servo)?;
            controller
                .set_mode(channel, settings.mode)
                .map_err(|_| SenderError::Servo)?;
            controller
                .set_position(channel, 0)
                .map_err(|_| SenderError::Servo)?;
        }
        Ok(())
    }

    /// Parse and carry out one console line
    ///
    /// Motors go out first, then the echo is collected, then servos move.
    /// A missing echo is reported in the [`Report`], not as an error.
    pub fn handle_line(&mut self, line: &str) -> Result<Report, SenderError> {
        let command = parse_command_line(line)?;
        let mut report = Report {
            command,
            frame: None,
            echo: None,
            servos_applied: None,
        };

        if let Some(motors) = command.motors() {
            let frame = self.send_motors(&motors)?;
            report.frame = Some(frame);
            if self.config.wait_for_echo {
                report.echo = Some(self.collect_echo());
            }
        }

        if let Some(servos) = command.servos() {
            if self.apply_servos(&servos)? {
                report.servos_applied = Some(servos);
            }
        }

        Ok(report)
    }

    /// Encode and write one motor frame
    pub fn send_motors(&mut self, motors: &CommandVector) -> Result<Frame, SenderError> {
        let frame = encode(motors);
        self.link
            .write_blocking(&frame)
            .map_err(|_| SenderError::Link)?;
        self.link.flush().map_err(|_| SenderError::Link)?;
        Ok(frame)
    }

    /// Wait for the receiver's echo line
    pub fn collect_echo(&mut self) -> Result<Echo, SenderError> {
        wait_for_echo(
            &mut self.link,
            &self.clock,
            self.config.link.echo_timeout_us(),
        )
    }

    /// Move the servos; returns false when the node has none
    pub fn apply_servos(&mut self, servos: &ServoCommandVector) -> Result<bool, SenderError> {
        let Some(controller) = self.servos.as_mut() else {
            return Ok(false);
        };
        for (index, &degrees) in servos.iter().enumerate() {
            controller
                .set_position(self.config.servos.channel(index), degrees)
                .map_err(|_| SenderError::Servo)?;
        }
        Ok(true)
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn link(&self) -> &U {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut U {
        &mut self.link
    }

    pub fn servos(&self) -> Option<&S> {
        self.servos.as_ref()
    }
}
