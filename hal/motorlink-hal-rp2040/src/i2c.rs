//! I2C bus adapter
//!
//! Wraps any blocking `embedded-hal` I2C master (the embassy-rp `I2c` in
//! `Blocking` mode on target) so bus drivers can use [`I2cBus`].

use embedded_hal::i2c::I2c;
use motorlink_hal::I2cBus;

pub struct HalI2c<I> {
    inner: I,
}

impl<I: I2c> HalI2c<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for HalI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner.write_read(address, write_data, read_buf)
    }
}
