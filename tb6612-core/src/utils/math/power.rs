//! Signed motor power to H-bridge direction and magnitude.
//!
//! Motor power is a signed value in `-MAX_POWER..=MAX_POWER`. The sign selects the
//! direction and the absolute value becomes the PWM magnitude. Zero is a valid power
//! that means "stopped": forward direction with zero duty.
//!
//! # Example
//! ```rust
//! use tb6612_core::utils::math::power::{split_power, Direction, RangePolicy};
//!
//! assert_eq!(split_power(-100), Some((Direction::Reverse, 100)));
//! assert_eq!(split_power(0), Some((Direction::Forward, 0)));
//! assert_eq!(split_power(300), None);
//! assert_eq!(RangePolicy::Clamp.apply(300), Some((Direction::Forward, 255)));
//! assert_eq!(RangePolicy::Reject.apply(-40_000), None);
//! ```
use embedded_hal::digital::PinState;
use serde::{Deserialize, Serialize};

/// Largest accepted power magnitude (full duty).
pub const MAX_POWER: i32 = 255;

/// Rotation sense of a motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// How a motor is wired to its channel outputs.
///
/// A motor wired with negative polarity spins the opposite way for the same
/// IN1/IN2 pair, so its direction pair is swapped before it is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    Normal,
    Inverted,
}

/// Handling of power values outside `-MAX_POWER..=MAX_POWER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Drop the whole command; outputs keep their previous state.
    #[default]
    Reject,
    /// Saturate to `±MAX_POWER` and carry on.
    Clamp,
}

impl RangePolicy {
    /// Bring `power` into range according to the policy and split it into
    /// direction and magnitude.
    ///
    /// Returns `None` when the value is out of range and the policy rejects it.
    pub fn apply(
        self,
        power: i32,
    ) -> Option<(Direction, u8)> {
        match self {
            RangePolicy::Reject => split_power(power),
            RangePolicy::Clamp => split_power(power.clamp(-MAX_POWER, MAX_POWER)),
        }
    }
}

impl Direction {
    /// Direction as seen by a motor wired with the given polarity.
    pub fn wired(
        self,
        polarity: Polarity,
    ) -> Direction {
        match (self, polarity) {
            (direction, Polarity::Normal) => direction,
            (Direction::Forward, Polarity::Inverted) => Direction::Reverse,
            (Direction::Reverse, Polarity::Inverted) => Direction::Forward,
        }
    }

    /// IN1/IN2 levels: forward is (HIGH, LOW), reverse is (LOW, HIGH).
    pub fn levels(self) -> (PinState, PinState) {
        match self {
            Direction::Forward => (PinState::High, PinState::Low),
            Direction::Reverse => (PinState::Low, PinState::High),
        }
    }
}

/// Whether `power` lies within `-MAX_POWER..=MAX_POWER`.
pub fn in_range(power: i32) -> bool {
    (-MAX_POWER..=MAX_POWER).contains(&power)
}

/// Split a signed power into its direction and PWM magnitude.
///
/// Returns `None` for values outside `-MAX_POWER..=MAX_POWER`.
pub fn split_power(power: i32) -> Option<(Direction, u8)> {
    if !in_range(power) {
        return None;
    }
    let direction = if power < 0 {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    let magnitude = u8::try_from(power.unsigned_abs()).ok()?;
    Some((direction, magnitude))
}
