//! motorlink receiver node
//!
//! Listens for 10-byte motor frames on UART0, drives eight bidirectional
//! motor channels from PWM slices 0-7, echoes a diagnostic line for every
//! frame and flashes a WS2812 pixel green or red.
//!
//! Reference wiring:
//! - Link UART0: TX GPIO28, RX GPIO29
//! - Motor channel n: forward GPIO 2n, reverse GPIO 2n+1
//! - Status pixel: GPIO16 (PIO0 SM0)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::Uart;
use {defmt_rtt as _, panic_probe as _};

use motorlink_core::config::{parse_receiver_config, ChannelMap, ReceiverConfig};
use motorlink_core::{LinkEvent, Receiver};
use motorlink_hal::uart::UartConfig;
use motorlink_hal_rp2040::pins::check_motor_pins;
use motorlink_hal_rp2040::pwm::slice_config;
use motorlink_hal_rp2040::uart::peripheral_config;
use motorlink_hal_rp2040::{BlockingUart, EmbassyClock, PwmBank, Ws2812};
use motorlink_protocol::FRAME_LEN;

/// Embedded configuration, checked by build.rs
const EMBEDDED_CONFIG: &str = include_str!("../receiver.toml");

/// GPIOs owned by the link UART and the status pixel
const RESERVED_PINS: [u8; 3] = [16, 28, 29];

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("motorlink receiver starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let uart_config = peripheral_config(&UartConfig::with_baudrate(config.link.baud_rate));
    let uart = Uart::new_blocking(p.UART0, p.PIN_28, p.PIN_29, uart_config);
    let link = BlockingUart::new(uart);
    info!("Link UART0 at {} baud", config.link.baud_rate);

    let pwm = PwmBank::new([
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE4, p.PIN_8, p.PIN_9, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE6, p.PIN_12, p.PIN_13, slice_config()),
        Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, slice_config()),
    ]);
    info!("PWM bank initialized");

    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let pixel = Ws2812::new(&mut common, sm0, p.PIN_16);
    info!("Status pixel on GPIO16");

    let mut receiver = Receiver::new(link, pwm, pixel, EmbassyClock, &config);
    if let Err(e) = receiver.start() {
        error!("Failed to stop motor outputs: {}", e);
    }

    if config.drive_outputs {
        info!("Waiting for {}-byte frames", FRAME_LEN);
    } else {
        warn!("drive_outputs = false, frames are reported only");
    }

    loop {
        match receiver.step() {
            Ok(Some(LinkEvent::Accepted(commands))) => {
                debug!("Frame {}: {}", receiver.accepted(), commands);
            }
            Ok(Some(LinkEvent::Rejected(reason))) => {
                warn!("Frame rejected ({} so far): {}", receiver.rejected(), reason);
            }
            Ok(None) => {}
            Err(e) => error!("Receiver loop: {}", e),
        }
    }
}

/// Parse the embedded config, falling back to defaults on any error
fn load_config() -> ReceiverConfig {
    let mut config = match parse_receiver_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded config");
            config
        }
        Err(e) => {
            error!("Embedded config invalid ({}), using defaults", e);
            ReceiverConfig::default()
        }
    };

    if let Err(e) = check_motor_pins(&config.channels, &RESERVED_PINS) {
        error!("Channel table unusable ({}), using default wiring", e);
        config.channels = ChannelMap::default();
    }

    config
}
