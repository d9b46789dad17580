//! motorlink sender node
//!
//! Reads operator lines on the console UART, sends motor frames to the
//! receiver over the link UART, reports the receiver's echo and drives up
//! to four servos on a PCA9685.
//!
//! Reference wiring:
//! - Link UART0: TX GPIO0, RX GPIO1
//! - Console UART1: TX GPIO4, RX GPIO5
//! - PCA9685 on I2C0: SDA GPIO12, SCL GPIO13, 400 kHz

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::uart::Uart;
use embassy_time::Delay;
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use motorlink_core::config::{parse_sender_config, SenderConfig};
use motorlink_core::sender::{read_line, Report, UartWriter, BANNER, CONSOLE_LINE_LEN};
use motorlink_core::{Sender, SenderError};
use motorlink_drivers::{Pca9685, Pca9685Config};
use motorlink_hal::i2c::I2cConfig;
use motorlink_hal::uart::UartConfig;
use motorlink_hal::UartTx;
use motorlink_hal_rp2040::uart::peripheral_config;
use motorlink_hal_rp2040::{BlockingUart, EmbassyClock, HalI2c};
use motorlink_protocol::Diagnostic;

/// Embedded configuration, checked by build.rs
const EMBEDDED_CONFIG: &str = include_str!("../sender.toml");

/// Console line rate
const CONSOLE_BAUD: u32 = 115_200;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("motorlink sender starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let link_config = peripheral_config(&UartConfig::with_baudrate(config.link.baud_rate));
    let link = BlockingUart::new(Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, link_config));
    info!("Link UART0 at {} baud", config.link.baud_rate);

    let console_config = peripheral_config(&UartConfig::with_baudrate(CONSOLE_BAUD));
    let mut console =
        BlockingUart::new(Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, console_config));

    let servos = if config.servos.enabled {
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = I2cConfig::FAST.frequency;
        let bus = HalI2c::new(I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, i2c_config));

        let mut pca = Pca9685::new(bus, Pca9685Config::from_servo_config(&config.servos));
        let started = pca
            .begin()
            .and_then(|_| pca.set_frequency(config.servos.pwm_frequency_hz, &mut Delay));
        match started {
            Ok(()) => {
                info!(
                    "PCA9685 at {:#x}, {} Hz",
                    config.servos.i2c_address, config.servos.pwm_frequency_hz
                );
                Some(pca)
            }
            Err(e) => {
                error!("PCA9685 not responding: {}", e);
                warn!("Continuing without servos");
                None
            }
        }
    } else {
        info!("Servos disabled in config");
        None
    };

    let mut sender = Sender::new(link, servos, EmbassyClock, config);
    if let Err(e) = sender.start() {
        error!("Servo start-up failed: {}", e);
    }

    if console.write_blocking(BANNER.as_bytes()).is_err() {
        warn!("Console write failed");
    }

    let mut line: String<CONSOLE_LINE_LEN> = String::new();
    loop {
        if let Err(e) = read_line(&mut console, &mut line) {
            warn!("Console read failed: {}", e);
            continue;
        }

        match sender.handle_line(&line) {
            Ok(report) => {
                log_report(&report);
                if report.write_to(&mut UartWriter(&mut console)).is_err() {
                    warn!("Console write failed");
                }
            }
            Err(SenderError::InputParse(e)) => {
                debug!("Rejected line: {}", line.as_str());
                if write!(UartWriter(&mut console), "{}\r\n", e).is_err() {
                    warn!("Console write failed");
                }
            }
            Err(e) => error!("Line not sent: {}", e),
        }
    }
}

fn log_report(report: &Report) {
    if let Some(frame) = report.frame {
        debug!("Sent frame {:02x}", frame);
    }
    match &report.echo {
        Some(Ok(echo)) => match echo.diagnostic() {
            Some(Diagnostic::Motors(commands)) => debug!("Receiver applied {}", commands),
            Some(_) => warn!("Receiver reported: {}", echo.as_str()),
            None => warn!("Unrecognised echo: {}", echo.as_str()),
        },
        Some(Err(e)) => warn!("No echo: {}", e),
        None => {}
    }
}

/// Parse the embedded config, falling back to defaults on any error
fn load_config() -> SenderConfig {
    match parse_sender_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded config");
            config
        }
        Err(e) => {
            error!("Embedded config invalid ({}), using defaults", e);
            SenderConfig::default()
        }
    }
}
