//! Polled UART on the RP2040
//!
//! The link and the console both run the peripheral in blocking mode. Writes
//! wait for the TX FIFO; reads go through the non-blocking `embedded-hal-nb`
//! interface so the receiver loop never stalls on an idle line.

use embassy_rp::uart::{self, Blocking, Uart};
use motorlink_hal::uart::{DataBits, Parity, StopBits, UartConfig};
use motorlink_hal::{UartRx, UartTx};

/// Blocking UART implementing the `motorlink-hal` serial traits
pub struct BlockingUart<'d> {
    inner: Uart<'d, Blocking>,
}

impl<'d> BlockingUart<'d> {
    pub fn new(inner: Uart<'d, Blocking>) -> Self {
        Self { inner }
    }

    pub fn inner_mut(&mut self) -> &mut Uart<'d, Blocking> {
        &mut self.inner
    }
}

/// Translate a line configuration into the embassy-rp peripheral config
pub fn peripheral_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

impl UartTx for BlockingUart<'_> {
    type Error = uart::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.blocking_flush()
    }
}

impl UartRx for BlockingUart<'_> {
    type Error = uart::Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        match embedded_hal_nb::serial::Read::read(&mut self.inner) {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(e),
        }
    }
}
