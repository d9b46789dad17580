//! Build script for motorlink-receiver
//!
//! - Sets up linker search paths for memory.x
//! - Validates receiver.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs wired to the motor PWM bank
const MOTOR_BANK_PINS: i64 = 16;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate receiver.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=receiver.toml");

    let config_path = Path::new("receiver.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: receiver.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The receiver firmware embeds receiver.toml at build time.       ║\n\
            ║  Please create one in the motorlink-receiver directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read receiver.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in receiver.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_channels(&config, &mut errors);
    report("Invalid receiver configuration", &errors);

    println!("cargo:warning=receiver.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Only the sections the firmware parser understands
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !["link", "receiver", "channels"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(link) = config.get("link").and_then(|l| l.as_table()) else {
        return;
    };

    for (key, value) in link {
        let limit = match key.as_str() {
            "baud_rate" => u32::MAX as i64,
            "frame_timeout_ms" | "indicator_hold_ms" | "echo_timeout_ms" => u16::MAX as i64,
            _ => {
                errors.push(format!("[link] unknown key '{}'", key));
                continue;
            }
        };
        match value.as_integer() {
            Some(n) if n > 0 && n <= limit => {}
            _ => errors.push(format!("[link] {} must be 1-{}", key, limit)),
        }
    }

    if let Some(receiver) = config.get("receiver").and_then(|r| r.as_table()) {
        for (key, value) in receiver {
            if key != "drive_outputs" {
                errors.push(format!("[receiver] unknown key '{}'", key));
            } else if !value.is_bool() {
                errors.push("[receiver] drive_outputs must be true or false".to_string());
            }
        }
    }
}

/// Pin lists must hold 8 distinct pins on the PWM bank
fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(channels) = config.get("channels").and_then(|c| c.as_table()) else {
        return;
    };

    let mut seen: Vec<i64> = Vec::new();
    for (key, value) in channels {
        if key != "forward" && key != "reverse" {
            errors.push(format!("[channels] unknown key '{}'", key));
            continue;
        }
        let Some(pins) = value.as_array() else {
            errors.push(format!("[channels] {} must be an array", key));
            continue;
        };
        if pins.len() != 8 {
            errors.push(format!("[channels] {} needs 8 pins, got {}", key, pins.len()));
        }
        for pin in pins {
            match pin.as_integer() {
                Some(n) if !(0..MOTOR_BANK_PINS).contains(&n) => {
                    errors.push(format!("[channels] {} pin {} is not on GPIO 0-15", key, n));
                }
                Some(n) if seen.contains(&n) => {
                    errors.push(format!("[channels] pin {} used twice", n));
                }
                Some(n) => seen.push(n),
                None => errors.push(format!("[channels] {} must hold integers", key)),
            }
        }
    }
}
