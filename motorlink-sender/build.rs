//! Build script for motorlink-sender
//!
//! - Sets up linker search paths for memory.x
//! - Validates sender.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

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

/// Validate sender.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=sender.toml");

    let config_path = Path::new("sender.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: sender.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The sender firmware embeds sender.toml at build time.           ║\n\
            ║  Please create one in the motorlink-sender directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read sender.toml                               ║\n\
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
                ║  ERROR: Invalid TOML syntax in sender.toml                       ║\n\
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
    validate_servos(&config, &mut errors);
    report("Invalid sender configuration", &errors);

    println!("cargo:warning=sender.toml validated successfully");
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
        if !["link", "sender", "servos"].contains(&name.as_str()) {
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

    if let Some(sender) = config.get("sender").and_then(|s| s.as_table()) {
        for (key, value) in sender {
            if key != "wait_for_echo" {
                errors.push(format!("[sender] unknown key '{}'", key));
            } else if !value.is_bool() {
                errors.push("[sender] wait_for_echo must be true or false".to_string());
            }
        }
    }
}

/// Servo settings must describe a usable PCA9685 channel block
fn validate_servos(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(servos) = config.get("servos").and_then(|s| s.as_table()) else {
        return;
    };

    let int = |key: &str| servos.get(key).and_then(|v| v.as_integer());

    for (key, value) in servos {
        let range = match key.as_str() {
            "enabled" => {
                if !value.is_bool() {
                    errors.push("[servos] enabled must be true or false".to_string());
                }
                continue;
            }
            "mode" => {
                if !matches!(value.as_str(), Some("fast") | Some("off")) {
                    errors.push("[servos] mode must be 'fast' or 'off'".to_string());
                }
                continue;
            }
            "i2c_address" => 0x03..=0x77,
            "pwm_frequency_hz" => 24..=1526,
            "min_pulse_us" | "max_pulse_us" => 1..=20_000,
            "min_degrees" | "max_degrees" => -360..=360,
            "first_channel" => 0..=12,
            _ => {
                errors.push(format!("[servos] unknown key '{}'", key));
                continue;
            }
        };
        match value.as_integer() {
            Some(n) if range.contains(&n) => {}
            _ => errors.push(format!(
                "[servos] {} must be {}-{}",
                key,
                range.start(),
                range.end()
            )),
        }
    }

    let min_pulse = int("min_pulse_us").unwrap_or(500);
    let max_pulse = int("max_pulse_us").unwrap_or(2500);
    if min_pulse >= max_pulse {
        errors.push("[servos] min_pulse_us must be below max_pulse_us".to_string());
    }

    let min_deg = int("min_degrees").unwrap_or(-90);
    let max_deg = int("max_degrees").unwrap_or(90);
    if min_deg >= max_deg {
        errors.push("[servos] min_degrees must be below max_degrees".to_string());
    }
}
