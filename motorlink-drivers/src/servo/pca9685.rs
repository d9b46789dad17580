//! PCA9685 16-channel PWM controller driving hobby servos
//!
//! The PCA9685 generates 12-bit PWM on 16 outputs from an internal 25 MHz
//! oscillator. For servos the prescaler is set to a 50 Hz period and each
//! channel's OFF count is the pulse width in ticks.
//!
//! # Usage
//!
//! ```ignore
//! let mut servos = Pca9685::new(i2c, Pca9685Config::from_servo_config(&config));
//! servos.begin()?;
//! servos.set_frequency(50, &mut delay)?;
//! servos.set_range(0, -90, 90)?;
//! servos.set_position(0, 45)?;
//! ```

use embedded_hal::delay::DelayNs;

use motorlink_core::config::ServoConfig;
use motorlink_core::traits::{ServoController, ServoMode};
use motorlink_hal::I2cBus;

/// PCA9685 register addresses
pub mod reg {
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    /// First channel register; each channel has ON_L, ON_H, OFF_L, OFF_H
    pub const LED0_ON_L: u8 = 0x06;
    pub const PRE_SCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const AUTO_INCREMENT: u8 = 0x20;
    pub const SLEEP: u8 = 0x10;
    pub const ALLCALL: u8 = 0x01;
}

/// MODE2 totem-pole outputs
const MODE2_OUTDRV: u8 = 0x04;

/// Full-off bit in the OFF_H register
const FULL_OFF: u8 = 0x10;

/// Number of PWM outputs
pub const CHANNEL_COUNT: u8 = 16;

/// Counter steps per PWM period
const TICKS_PER_PERIOD: u32 = 4096;

/// Oscillator settling time after wake-up
const RESTART_DELAY_US: u32 = 500;

/// Servo driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Channel number is 16 or higher
    InvalidChannel(u8),
    /// Frequency outside 24-1526 Hz
    InvalidFrequency(u16),
}

/// PCA9685 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pca9685Config {
    /// 7-bit I2C address (0x40 with all address pins low)
    pub address: u8,
    /// Internal oscillator frequency
    pub oscillator_hz: u32,
    /// Pulse width at the low end of a channel's range
    pub min_pulse_us: u16,
    /// Pulse width at the high end of a channel's range
    pub max_pulse_us: u16,
}

impl Default for Pca9685Config {
    fn default() -> Self {
        Self {
            address: 0x40,
            oscillator_hz: 25_000_000,
            min_pulse_us: 500,
            max_pulse_us: 2500,
        }
    }
}

impl Pca9685Config {
    pub fn from_servo_config(servos: &ServoConfig) -> Self {
        Self {
            address: servos.i2c_address,
            min_pulse_us: servos.min_pulse_us,
            max_pulse_us: servos.max_pulse_us,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelState {
    min_deg: i16,
    max_deg: i16,
    mode: ServoMode,
    position: i16,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            min_deg: -90,
            max_deg: 90,
            mode: ServoMode::Fast,
            position: 0,
        }
    }
}

/// PCA9685 servo controller
pub struct Pca9685<B: I2cBus> {
    bus: B,
    config: Pca9685Config,
    frequency_hz: u16,
    channels: [ChannelState; CHANNEL_COUNT as usize],
}

impl<B: I2cBus> Pca9685<B> {
    pub fn new(bus: B, config: Pca9685Config) -> Self {
        Self {
            bus,
            config,
            frequency_hz: 0,
            channels: [ChannelState::default(); CHANNEL_COUNT as usize],
        }
    }

    /// Wake the chip with register auto-increment and push-pull outputs
    pub fn begin(&mut self) -> Result<(), ServoError<B::Error>> {
        self.write(reg::MODE1, mode1::AUTO_INCREMENT | mode1::ALLCALL)?;
        self.write(reg::MODE2, MODE2_OUTDRV)
    }

    /// Prescaler value for a PWM frequency, rounded to nearest
    pub fn prescale_for(oscillator_hz: u32, frequency_hz: u16) -> u8 {
        let divisor = TICKS_PER_PERIOD * frequency_hz as u32;
        let rounded = (oscillator_hz + divisor / 2) / divisor;
        rounded.saturating_sub(1).clamp(3, 255) as u8
    }

    /// Set the PWM period for all channels
    ///
    /// The prescaler can only be written while the oscillator sleeps.
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        frequency_hz: u16,
        delay: &mut D,
    ) -> Result<(), ServoError<B::Error>> {
        if !(24..=1526).contains(&frequency_hz) {
            return Err(ServoError::InvalidFrequency(frequency_hz));
        }
        let prescale = Self::prescale_for(self.config.oscillator_hz, frequency_hz);

        let old_mode = self
            .bus
            .read_register(self.config.address, reg::MODE1)
            .map_err(ServoError::Bus)?;
        let sleeping = (old_mode & !mode1::RESTART) | mode1::SLEEP;
        self.write(reg::MODE1, sleeping)?;
        self.write(reg::PRE_SCALE, prescale)?;
        self.write(reg::MODE1, old_mode & !mode1::SLEEP)?;
        delay.delay_us(RESTART_DELAY_US);
        self.write(reg::MODE1, (old_mode & !mode1::SLEEP) | mode1::RESTART)?;

        self.frequency_hz = frequency_hz;
        Ok(())
    }

    /// Configured PWM frequency, 0 before [`set_frequency`](Self::set_frequency)
    pub fn frequency_hz(&self) -> u16 {
        self.frequency_hz
    }

    /// Counter ticks for a pulse width at the current frequency
    pub fn pulse_to_ticks(&self, pulse_us: u16) -> u16 {
        let ticks =
            pulse_us as u64 * TICKS_PER_PERIOD as u64 * self.frequency_hz as u64 / 1_000_000;
        ticks.min(TICKS_PER_PERIOD as u64 - 1) as u16
    }

    /// Pulse width for an angle inside a channel's range
    fn angle_to_pulse(&self, state: &ChannelState, degrees: i16) -> u16 {
        let span_deg = (state.max_deg as i32 - state.min_deg as i32).max(1);
        let span_us = self.config.max_pulse_us as i32 - self.config.min_pulse_us as i32;
        let offset = degrees as i32 - state.min_deg as i32;
        (self.config.min_pulse_us as i32 + offset * span_us / span_deg) as u16
    }

    /// Write ON=0, OFF=`ticks` to a channel
    pub fn set_pwm(&mut self, channel: u8, ticks: u16) -> Result<(), ServoError<B::Error>> {
        let register = self.channel_register(channel)?;
        let [off_l, off_h] = ticks.to_le_bytes();
        self.bus
            .write(self.config.address, &[register, 0, 0, off_l, off_h])
            .map_err(ServoError::Bus)
    }

    /// Hold a channel low
    pub fn set_off(&mut self, channel: u8) -> Result<(), ServoError<B::Error>> {
        let register = self.channel_register(channel)?;
        self.bus
            .write(self.config.address, &[register, 0, 0, 0, FULL_OFF])
            .map_err(ServoError::Bus)
    }

    fn channel_register(&self, channel: u8) -> Result<u8, ServoError<B::Error>> {
        if channel >= CHANNEL_COUNT {
            return Err(ServoError::InvalidChannel(channel));
        }
        Ok(reg::LED0_ON_L + 4 * channel)
    }

    fn state(&self, channel: u8) -> Result<ChannelState, ServoError<B::Error>> {
        self.channels
            .get(channel as usize)
            .copied()
            .ok_or(ServoError::InvalidChannel(channel))
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), ServoError<B::Error>> {
        self.bus
            .write_register(self.config.address, register, value)
            .map_err(ServoError::Bus)
    }

    /// Re-emit the stored position of a channel
    fn refresh(&mut self, channel: u8) -> Result<(), ServoError<B::Error>> {
        let state = self.state(channel)?;
        match state.mode {
            ServoMode::Off => self.set_off(channel),
            ServoMode::Fast => {
                let pulse = self.angle_to_pulse(&state, state.position);
                self.set_pwm(channel, self.pulse_to_ticks(pulse))
            }
        }
    }

    /// Last commanded angle of a channel
    pub fn position(&self, channel: u8) -> Option<i16> {
        self.channels.get(channel as usize).map(|s| s.position)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: I2cBus> ServoController for Pca9685<B> {
    type Error = ServoError<B::Error>;

    fn channel_count(&self) -> u8 {
        CHANNEL_COUNT
    }

    fn set_range(&mut self, channel: u8, min_deg: i16, max_deg: i16) -> Result<(), Self::Error> {
        let mut state = self.state(channel)?;
        state.min_deg = min_deg.min(max_deg);
        state.max_deg = max_deg.max(min_deg);
        state.position = state.position.clamp(state.min_deg, state.max_deg);
        self.channels[channel as usize] = state;
        Ok(())
    }

    fn set_mode(&mut self, channel: u8, mode: ServoMode) -> Result<(), Self::Error> {
        let mut state = self.state(channel)?;
        state.mode = mode;
        self.channels[channel as usize] = state;
        if mode == ServoMode::Off {
            self.set_off(channel)?;
        }
        Ok(())
    }

    fn set_position(&mut self, channel: u8, degrees: i16) -> Result<(), Self::Error> {
        let mut state = self.state(channel)?;
        state.position = degrees.clamp(state.min_deg, state.max_deg);
        self.channels[channel as usize] = state;
        self.refresh(channel)
    }
}
