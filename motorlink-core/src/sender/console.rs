//! Operator console over a UART

use core::fmt;

use heapless::String;

use motorlink_hal::{UartRx, UartTx};

/// Longest console line kept; extra characters are dropped
pub const CONSOLE_LINE_LEN: usize = 128;

/// Printed once at start-up
pub const BANNER: &str = "motorlink sender ready\r\n\
    Enter 4 ints (servos), 8 ints (motors) or 12 ints (motors + servos)\r\n";

/// `fmt::Write` adapter that writes straight to a UART
pub struct UartWriter<'a, T: UartTx>(pub &'a mut T);

impl<T: UartTx> fmt::Write for UartWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_blocking(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Block until the operator enters a non-empty line
///
/// Accepts `\n`, `\r` or `\r\n` endings and handles backspace. Non-ASCII
/// bytes are ignored.
pub fn read_line<R: UartRx, const N: usize>(
    rx: &mut R,
    line: &mut String<N>,
) -> Result<(), R::Error> {
    line.clear();
    loop {
        match rx.read_byte()? {
            b'\r' | b'\n' => {
                if !line.trim().is_empty() {
                    return Ok(());
                }
                line.clear();
            }
            0x08 | 0x7F => {
                line.pop();
            }
            byte if byte.is_ascii() && !byte.is_ascii_control() => {
                let _ = line.push(byte as char);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    struct Input<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl UartRx for Input<'_> {
        type Error = ();

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            let byte = self.data.get(self.pos).copied();
            self.pos += 1;
            // Running past the script is a test bug; fail loudly
            byte.map(Some).ok_or(())
        }
    }

    #[derive(Default)]
    struct Output {
        text: String<64>,
    }

    impl UartTx for Output {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            for &b in data {
                self.text.push(b as char)?;
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_line_skips_blank_lines() {
        let mut rx = Input {
            data: b"\r\n  \r\n1 2 3 4\r\n",
            pos: 0,
        };
        let mut line: String<CONSOLE_LINE_LEN> = String::new();
        read_line(&mut rx, &mut line).unwrap();
        assert_eq!(line.as_str(), "1 2 3 4");
    }

    #[test]
    fn test_read_line_backspace() {
        let mut rx = Input {
            data: b"12\x083\n",
            pos: 0,
        };
        let mut line: String<16> = String::new();
        read_line(&mut rx, &mut line).unwrap();
        assert_eq!(line.as_str(), "13");
    }

    #[test]
    fn test_read_line_truncates() {
        let mut rx = Input {
            data: b"123456\n",
            pos: 0,
        };
        let mut line: String<4> = String::new();
        read_line(&mut rx, &mut line).unwrap();
        assert_eq!(line.as_str(), "1234");
    }

    #[test]
    fn test_uart_writer() {
        let mut out = Output::default();
        write!(UartWriter(&mut out), "got {}", 3).unwrap();
        assert_eq!(out.text.as_str(), "got 3");
    }
}
