use motorlink_core::drive_levels;
use motorlink_core::sender::{parse_command_line, OperatorCommand};
use motorlink_core::traits::Rgb;
use motorlink_core::StatusIndicator;
use proptest::prelude::*;

struct NullPixel;

impl motorlink_core::traits::StatusPixel for NullPixel {
    fn show(&mut self, _color: Rgb) {}
}

proptest! {
    #[test]
    fn at_most_one_side_driven(command in any::<i8>()) {
        let duty = drive_levels(command);
        prop_assert!(duty.forward == 0 || duty.reverse == 0);
        prop_assert!(duty.forward <= 254 && duty.reverse <= 254);
    }

    #[test]
    fn duty_follows_sign_and_magnitude(command in any::<i8>()) {
        let duty = drive_levels(command);
        let expected = ((command as i16).abs() * 2).min(254) as u8;
        match command.signum() {
            1 => prop_assert_eq!((duty.forward, duty.reverse), (expected, 0)),
            -1 => prop_assert_eq!((duty.forward, duty.reverse), (0, expected)),
            _ => prop_assert_eq!((duty.forward, duty.reverse), (0, 0)),
        }
    }

    #[test]
    fn indicator_holds_after_last_trigger(
        first in 0u64..1_000_000,
        gap in 0u64..500_000,
        probe in 0u64..500_000,
    ) {
        let mut indicator = StatusIndicator::new(NullPixel);
        let second = first + gap;
        indicator.trigger(Rgb::ERROR, first);
        indicator.trigger(Rgb::ERROR, second);

        prop_assert!(!indicator.poll(second + probe));
        prop_assert!(indicator.poll(second + 500_000));
    }

    #[test]
    fn eight_integers_always_parse_as_motors(values in any::<[i16; 8]>()) {
        let line = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
        let command = parse_command_line(&line).unwrap();
        let is_motors = matches!(command, OperatorCommand::Motors(_));
        prop_assert!(is_motors);
        let motors = command.motors().unwrap();
        for (motor, value) in motors.iter().zip(values) {
            prop_assert_eq!(*motor as i16, value.clamp(-128, 127));
        }
    }
}
