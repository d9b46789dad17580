//! Operator input parsing
//!
//! One console line holds whitespace-separated integers:
//!
//! - 4 values: servo positions, applied locally
//! - 8 values: motor commands, sent as one frame
//! - 12 values: 8 motor commands followed by 4 servo positions
//!
//! Motor values are clamped to the signed 8-bit range and servo values to
//! ±90 degrees. Any other token count is rejected.

use core::fmt;

use motorlink_protocol::{clamp_command, CommandVector, PAYLOAD_LEN};

use crate::config::SERVO_COUNT;

/// Servo positions are clamped to this many degrees either side of centre
pub const SERVO_LIMIT_DEG: i16 = 90;

/// Most tokens a line can usefully carry
pub const MAX_TOKENS: usize = PAYLOAD_LEN + SERVO_COUNT;

/// One position per servo, in degrees
pub type ServoCommandVector = [i16; SERVO_COUNT];

/// Why a console line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Token count is not 4, 8 or 12
    TokenCount(usize),
    /// A token is not a decimal integer
    InvalidToken,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::TokenCount(n) => write!(f, "Need 4, 8 or 12 ints; got {}", n),
            InputError::InvalidToken => f.write_str("Need 4, 8 or 12 ints; got a non-integer"),
        }
    }
}

/// A parsed console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorCommand {
    Servos(ServoCommandVector),
    Motors(CommandVector),
    MotorsAndServos {
        motors: CommandVector,
        servos: ServoCommandVector,
    },
}

impl OperatorCommand {
    /// Motor part, if the line had one
    pub fn motors(&self) -> Option<CommandVector> {
        match self {
            OperatorCommand::Motors(motors) | OperatorCommand::MotorsAndServos { motors, .. } => {
                Some(*motors)
            }
            OperatorCommand::Servos(_) => None,
        }
    }

    /// Servo part, if the line had one
    pub fn servos(&self) -> Option<ServoCommandVector> {
        match self {
            OperatorCommand::Servos(servos) | OperatorCommand::MotorsAndServos { servos, .. } => {
                Some(*servos)
            }
            OperatorCommand::Motors(_) => None,
        }
    }
}

/// Clamp an operator-supplied angle to ±90 degrees
pub fn clamp_servo(value: i64) -> i16 {
    value.clamp(-SERVO_LIMIT_DEG as i64, SERVO_LIMIT_DEG as i64) as i16
}

/// Parse one console line
pub fn parse_command_line(line: &str) -> Result<OperatorCommand, InputError> {
    let mut values = [0i64; MAX_TOKENS];
    let mut count = 0;

    for token in line.split_whitespace() {
        if let Some(slot) = values.get_mut(count) {
            *slot = token.parse().map_err(|_| InputError::InvalidToken)?;
        }
        count += 1;
    }

    match count {
        4 => Ok(OperatorCommand::Servos(servos_from(&values[..4]))),
        8 => Ok(OperatorCommand::Motors(motors_from(&values[..8]))),
        12 => Ok(OperatorCommand::MotorsAndServos {
            motors: motors_from(&values[..8]),
            servos: servos_from(&values[8..12]),
        }),
        n => Err(InputError::TokenCount(n)),
    }
}

fn motors_from(values: &[i64]) -> CommandVector {
    let mut motors = [0i8; PAYLOAD_LEN];
    for (motor, &value) in motors.iter_mut().zip(values) {
        *motor = clamp_command(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    }
    motors
}

fn servos_from(values: &[i64]) -> ServoCommandVector {
    let mut servos = [0i16; SERVO_COUNT];
    for (servo, &value) in servos.iter_mut().zip(values) {
        *servo = clamp_servo(value);
    }
    servos
}
