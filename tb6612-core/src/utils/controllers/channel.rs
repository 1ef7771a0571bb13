//! H-bridge channel abstraction for the TB6612 drive core.
//!
//! One TB6612FNG channel is two direction inputs (IN1/IN2) plus one PWM input.
//! `HBridge` is the seam the dispatcher drives; `MotorChannel` implements it over
//! `embedded-hal` output pins and a duty-cycle output.
//!
//! Truth table for a motor wired with normal polarity:
//!
//! | IN1  | IN2  | PWM     | Behavior     |
//! |------|------|---------|--------------|
//! | H    | L    | pulsing | forward (CW) |
//! | L    | H    | pulsing | reverse      |
//! | H    | H    | any     | short brake  |
//! | L    | L    | any     | stop (coast) |

use embedded_hal::{
    digital::{OutputPin, PinState},
    pwm::SetDutyCycle,
};

use crate::utils::math::power::{Direction, MAX_POWER};

/// Errors raised while writing to a channel's outputs.
#[derive(Debug)]
pub enum ChannelError<P: core::fmt::Debug, D: core::fmt::Debug> {
    /// Writing IN1 or IN2 failed.
    Direction(P),
    /// Writing the PWM duty cycle failed.
    Duty(D),
}

/// A single H-bridge channel: two direction lines and one magnitude output.
pub trait HBridge {
    type Error: core::fmt::Debug;

    /// Drive IN1/IN2 for the given direction.
    fn set_direction(
        &mut self,
        direction: Direction,
    ) -> Result<(), Self::Error>;

    /// Write a PWM magnitude in `0..=255`.
    fn set_magnitude(
        &mut self,
        magnitude: u8,
    ) -> Result<(), Self::Error>;

    /// IN1 and IN2 high with zero duty.
    fn short_brake(&mut self) -> Result<(), Self::Error>;

    /// Zero duty with IN1 and IN2 low, leaving the outputs floating.
    fn coast(&mut self) -> Result<(), Self::Error>;
}

/// `embedded-hal` backed H-bridge channel.
pub struct MotorChannel<IN1, IN2, PWM> {
    in1: IN1,
    in2: IN2,
    pwm: PWM,
}

impl<IN1, IN2, PWM> MotorChannel<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin<Error = IN1::Error>,
    PWM: SetDutyCycle,
{
    /// Create a channel from its IN1, IN2 and PWM outputs.
    pub fn new(
        in1: IN1,
        in2: IN2,
        pwm: PWM,
    ) -> Self {
        MotorChannel { in1, in2, pwm }
    }

    /// Give back the underlying outputs.
    pub fn release(self) -> (IN1, IN2, PWM) {
        (self.in1, self.in2, self.pwm)
    }

    fn write_pair(
        &mut self,
        in1: PinState,
        in2: PinState,
    ) -> Result<(), ChannelError<IN1::Error, PWM::Error>> {
        self.in1.set_state(in1).map_err(ChannelError::Direction)?;
        self.in2.set_state(in2).map_err(ChannelError::Direction)
    }
}

impl<IN1, IN2, PWM> HBridge for MotorChannel<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin<Error = IN1::Error>,
    PWM: SetDutyCycle,
{
    type Error = ChannelError<IN1::Error, PWM::Error>;

    fn set_direction(
        &mut self,
        direction: Direction,
    ) -> Result<(), Self::Error> {
        let (in1, in2) = direction.levels();
        self.write_pair(in1, in2)
    }

    fn set_magnitude(
        &mut self,
        magnitude: u8,
    ) -> Result<(), Self::Error> {
        // scaled against the PWM's own resolution
        self.pwm
            .set_duty_cycle_fraction(u16::from(magnitude), MAX_POWER as u16)
            .map_err(ChannelError::Duty)
    }

    fn short_brake(&mut self) -> Result<(), Self::Error> {
        self.write_pair(PinState::High, PinState::High)?;
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(ChannelError::Duty)
    }

    fn coast(&mut self) -> Result<(), Self::Error> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(ChannelError::Duty)?;
        self.write_pair(PinState::Low, PinState::Low)
    }
}
