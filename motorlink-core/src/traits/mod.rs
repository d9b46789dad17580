//! Hardware capability traits
//!
//! These traits sit between the link logic and the peripherals that are
//! more than a register write: the addressable status LED and the I2C
//! servo controller. Plain buses live in `motorlink-hal`.

pub mod pixel;
pub mod servo;

pub use pixel::{Rgb, StatusPixel};
pub use servo::{ServoController, ServoMode};
