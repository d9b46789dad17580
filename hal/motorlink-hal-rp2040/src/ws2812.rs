//! PIO-driven WS2812 status pixel
//!
//! One state machine shifts 24-bit GRB words out at 800 kHz. Each bit is
//! ten PIO cycles: a fixed high start, a data-dependent middle and a low
//! tail.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use motorlink_core::traits::{Rgb, StatusPixel};

/// WS2812 bit rate
pub const BIT_RATE_HZ: u32 = 800_000;

/// PIO cycles per data bit
const CYCLES_PER_BIT: u32 = 10;

/// PIO clock divider for a given system clock, as 16.8 fixed-point bits
pub const fn divider_bits(sys_clk_hz: u32) -> u32 {
    ((sys_clk_hz as u64 * 256) / (BIT_RATE_HZ * CYCLES_PER_BIT) as u64) as u32
}

/// Single WS2812 pixel on one PIO state machine
pub struct Ws2812<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> Ws2812<'d, PIO, SM> {
    pub fn new<P: PioPin>(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pin: Peri<'d, P>,
    ) -> Self {
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "out x, 1        side 0 [2]",
            "jmp !x do_zero  side 1 [1]",
            "do_one:",
            "jmp bitloop     side 1 [4]",
            "do_zero:",
            "nop             side 0 [4]",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);
        let out_pin = common.make_pio_pin(pin);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&out_pin]);
        cfg.clock_divider = U24F8::from_bits(divider_bits(clk_sys_freq()));
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &[&out_pin]);
        sm.set_enable(true);

        Self { sm }
    }
}

impl<PIO: Instance, const SM: usize> StatusPixel for Ws2812<'_, PIO, SM> {
    fn show(&mut self, color: Rgb) {
        // Autopull takes the top 24 bits
        let word = color.to_grb() << 8;
        while !self.sm.tx().try_push(word) {}
    }
}
