//! Minimal TOML parser for node configuration
//!
//! Handles only the subset the node files use and allocates nothing, so it
//! runs on the target straight from `include_str!`.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` with integers (decimal or `0x` hex), booleans, quoted
//!   words and integer arrays
//! - Comments (`# ...`), including trailing ones
//!
//! Keys left out keep their defaults.

use heapless::Vec;

use motorlink_protocol::PAYLOAD_LEN;

use super::types::{ChannelMap, ConfigError, LinkConfig, ReceiverConfig, SenderConfig, ServoConfig};
use crate::traits::ServoMode;

/// Largest integer array accepted
const MAX_ARRAY_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value<'a> {
    Integer(i64),
    Bool(bool),
    Array(Vec<i64, MAX_ARRAY_LEN>),
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Receiver,
    Channels,
    Sender,
    Servos,
}

/// Parse a receiver node configuration file
pub fn parse_receiver_config(input: &str) -> Result<ReceiverConfig, ConfigError> {
    let mut config = ReceiverConfig::default();
    let mut forward: Option<[u8; PAYLOAD_LEN]> = None;
    let mut reverse: Option<[u8; PAYLOAD_LEN]> = None;

    parse_lines(input, |section, key, value| match section {
        Section::Link => apply_link(&mut config.link, key, value),
        Section::Receiver => match key {
            "drive_outputs" => {
                config.drive_outputs = as_bool(value)?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey),
        },
        Section::Channels => match key {
            "forward" => {
                forward = Some(as_pins(value)?);
                Ok(())
            }
            "reverse" => {
                reverse = Some(as_pins(value)?);
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey),
        },
        _ => Err(ConfigError::InvalidSection),
    })?;

    let defaults = ChannelMap::default();
    let forward = forward.unwrap_or_else(|| defaults.channels.map(|p| p.forward));
    let reverse = reverse.unwrap_or_else(|| defaults.channels.map(|p| p.reverse));
    config.channels = ChannelMap::from_pins(forward, reverse);
    config.channels.validate()?;

    Ok(config)
}

/// Parse a sender node configuration file
pub fn parse_sender_config(input: &str) -> Result<SenderConfig, ConfigError> {
    let mut config = SenderConfig::default();

    parse_lines(input, |section, key, value| match section {
        Section::Link => apply_link(&mut config.link, key, value),
        Section::Sender => match key {
            "wait_for_echo" => {
                config.wait_for_echo = as_bool(value)?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey),
        },
        Section::Servos => apply_servos(&mut config.servos, key, value),
        _ => Err(ConfigError::InvalidSection),
    })?;

    config.servos.validate()?;
    Ok(config)
}

/// Walk the file, handing every `key = value` to `apply` with its section
fn parse_lines<F>(input: &str, mut apply: F) -> Result<(), ConfigError>
where
    F: FnMut(Section, &str, &Value<'_>) -> Result<(), ConfigError>,
{
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = parse_section_header(header)?;
            continue;
        }

        let (key, raw) = line.split_once('=').ok_or(ConfigError::InvalidLine)?;
        let value = parse_value(raw.trim())?;
        apply(section, key.trim(), &value)?;
    }

    Ok(())
}

fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (pos, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..pos],
            _ => {}
        }
    }
    line
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "link" => Ok(Section::Link),
        "receiver" => Ok(Section::Receiver),
        "channels" => Ok(Section::Channels),
        "sender" => Ok(Section::Sender),
        "servos" => Ok(Section::Servos),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn parse_value(raw: &str) -> Result<Value<'_>, ConfigError> {
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let mut items = Vec::new();
        for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            items
                .push(parse_integer(item)?)
                .map_err(|_| ConfigError::InvalidValue)?;
        }
        return Ok(Value::Array(items));
    }

    if let Some(text) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return Ok(Value::Text(text));
    }

    parse_integer(raw).map(Value::Integer)
}

fn parse_integer(raw: &str) -> Result<i64, ConfigError> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (body, radix) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };
    // `from_str_radix` takes its own sign, so only digits may follow ours
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(ConfigError::InvalidValue);
    }
    let magnitude = i64::from_str_radix(body, radix).map_err(|_| ConfigError::InvalidValue)?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn as_bool(value: &Value<'_>) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn as_ranged<T: TryFrom<i64>>(value: &Value<'_>) -> Result<T, ConfigError> {
    match value {
        Value::Integer(n) => T::try_from(*n).map_err(|_| ConfigError::InvalidValue),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn as_pins(value: &Value<'_>) -> Result<[u8; PAYLOAD_LEN], ConfigError> {
    let Value::Array(items) = value else {
        return Err(ConfigError::InvalidValue);
    };
    if items.len() != PAYLOAD_LEN {
        return Err(ConfigError::InvalidValue);
    }
    let mut pins = [0u8; PAYLOAD_LEN];
    for (pin, &item) in pins.iter_mut().zip(items.iter()) {
        *pin = u8::try_from(item).map_err(|_| ConfigError::InvalidValue)?;
    }
    Ok(pins)
}

fn apply_link(link: &mut LinkConfig, key: &str, value: &Value<'_>) -> Result<(), ConfigError> {
    match key {
        "baud_rate" => link.baud_rate = as_ranged(value)?,
        "frame_timeout_ms" => link.frame_timeout_ms = as_ranged(value)?,
        "indicator_hold_ms" => link.indicator_hold_ms = as_ranged(value)?,
        "echo_timeout_ms" => link.echo_timeout_ms = as_ranged(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    if link.baud_rate == 0 || link.frame_timeout_ms == 0 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(())
}

fn apply_servos(servos: &mut ServoConfig, key: &str, value: &Value<'_>) -> Result<(), ConfigError> {
    match key {
        "enabled" => servos.enabled = as_bool(value)?,
        "i2c_address" => servos.i2c_address = as_ranged(value)?,
        "pwm_frequency_hz" => servos.pwm_frequency_hz = as_ranged(value)?,
        "min_pulse_us" => servos.min_pulse_us = as_ranged(value)?,
        "max_pulse_us" => servos.max_pulse_us = as_ranged(value)?,
        "min_degrees" => servos.min_degrees = as_ranged(value)?,
        "max_degrees" => servos.max_degrees = as_ranged(value)?,
        "first_channel" => servos.first_channel = as_ranged(value)?,
        "mode" => {
            servos.mode = match value {
                Value::Text("fast") => ServoMode::Fast,
                Value::Text("off") => ServoMode::Off,
                _ => return Err(ConfigError::InvalidValue),
            }
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinPair;

    const RECEIVER_TOML: &str = r#"
# Receiver wiring
[link]
baud_rate = 115200
frame_timeout_ms = 50   # tighter window

[receiver]
drive_outputs = false

[channels]
forward = [0, 2, 4, 6, 8, 10, 12, 14]
reverse = [1, 3, 5, 7, 9, 11, 13, 15]
"#;

    const SENDER_TOML: &str = r#"
[link]
echo_timeout_ms = 250

[sender]
wait_for_echo = true

[servos]
enabled = true
i2c_address = 0x41
first_channel = 4
min_degrees = -45
max_degrees = 45
mode = "fast"
"#;

    #[test]
    fn test_parse_receiver() {
        let config = parse_receiver_config(RECEIVER_TOML).unwrap();
        assert_eq!(config.link.baud_rate, 115200);
        assert_eq!(config.link.frame_timeout_ms, 50);
        assert_eq!(config.link.indicator_hold_ms, 500);
        assert!(!config.drive_outputs);
        assert_eq!(config.channels, ChannelMap::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_receiver_config(""), Ok(ReceiverConfig::default()));
        assert_eq!(parse_sender_config("# nothing\n"), Ok(SenderConfig::default()));
    }

    #[test]
    fn test_partial_channel_override() {
        let input = "[channels]\nforward = [16, 17, 18, 19, 20, 21, 22, 26]\n";
        let config = parse_receiver_config(input).unwrap();
        assert_eq!(config.channels.channels[0], PinPair::new(16, 1));
        assert_eq!(config.channels.channels[7], PinPair::new(26, 15));
    }

    #[test]
    fn test_duplicate_pins_rejected() {
        let input = "[channels]\nreverse = [0, 3, 5, 7, 9, 11, 13, 15]\n";
        assert_eq!(
            parse_receiver_config(input),
            Err(ConfigError::DuplicatePin(0))
        );
    }

    #[test]
    fn test_short_pin_list_rejected() {
        let input = "[channels]\nforward = [0, 2]\n";
        assert_eq!(parse_receiver_config(input), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_parse_sender() {
        let config = parse_sender_config(SENDER_TOML).unwrap();
        assert_eq!(config.link.echo_timeout_ms, 250);
        assert_eq!(config.servos.i2c_address, 0x41);
        assert_eq!(config.servos.channel(0), 4);
        assert_eq!(config.servos.min_degrees, -45);
        assert_eq!(config.servos.mode, ServoMode::Fast);
    }

    #[test]
    fn test_foreign_section_rejected() {
        assert_eq!(
            parse_sender_config("[channels]\nforward = []\n"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(
            parse_receiver_config("[motors]\n"),
            Err(ConfigError::InvalidSection)
        );
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            parse_sender_config("[link]\nbaud_rate = fast\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_sender_config("[servos]\ni2c_address = 300\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_sender_config("[link]\nspeed = 1\n"),
            Err(ConfigError::UnknownKey)
        );
        assert_eq!(
            parse_sender_config("[link]\nbaud_rate\n"),
            Err(ConfigError::InvalidLine)
        );
    }

    #[test]
    fn test_integer_signs() {
        assert_eq!(parse_integer("-5"), Ok(-5));
        assert_eq!(parse_integer("0x40"), Ok(64));
        assert_eq!(parse_integer("--5"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_integer("+5"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_integer("-+5"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_integer("0x-5"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_integer("-"), Err(ConfigError::InvalidValue));
        assert_eq!(
            parse_receiver_config("[link]\nframe_timeout_ms = --100\n"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_hash_inside_quotes_kept() {
        assert_eq!(strip_comment("mode = \"fast\" # trailing"), "mode = \"fast\" ");
        assert_eq!(strip_comment("name = \"a#b\" # note"), "name = \"a#b\" ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(
            parse_sender_config("[servos]\nmode = \"off\" # idle\n")
                .map(|c| c.servos.mode),
            Ok(ServoMode::Off)
        );
    }
}
