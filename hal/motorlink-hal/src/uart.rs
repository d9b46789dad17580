//! UART serial communication abstractions
//!
//! The link is polled: the receiver checks for one byte per loop iteration
//! and never blocks on input, while the sender writes whole frames and then
//! polls for the echo line until its own deadline passes.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Take one byte if the receive FIFO holds one
    ///
    /// Returns `Ok(None)` immediately when nothing is pending.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read a single byte, spinning until one arrives
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        loop {
            if let Some(byte) = self.try_read_byte()? {
                return Ok(byte);
            }
        }
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        bytes: [u8; 3],
        pos: usize,
        empty_polls: u8,
    }

    impl UartRx for Scripted {
        type Error = ();

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            if self.empty_polls > 0 {
                self.empty_polls -= 1;
                return Ok(None);
            }
            let byte = self.bytes.get(self.pos).copied();
            self.pos += 1;
            Ok(byte)
        }
    }

    #[test]
    fn test_read_byte_waits_past_empty_polls() {
        let mut rx = Scripted {
            bytes: [7, 8, 9],
            pos: 0,
            empty_polls: 5,
        };
        assert_eq!(rx.read_byte(), Ok(7));
        assert_eq!(rx.empty_polls, 0);
        assert_eq!(rx.read_byte(), Ok(8));
    }

    #[test]
    fn test_default_config_is_9600_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
