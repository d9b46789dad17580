//! Configuration types
//!
//! Node configuration is compiled into the firmware as a small TOML file
//! and parsed at boot by [`parser`]. Defaults match the reference wiring.

pub mod parser;
pub mod types;

pub use parser::{parse_receiver_config, parse_sender_config};
pub use types::*;
