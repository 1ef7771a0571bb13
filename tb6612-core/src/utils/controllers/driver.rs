//! Dual-motor dispatcher for a TB6612FNG board.
//!
//! `Tb6612` turns a signed power pair into direction and magnitude writes on its
//! two channels. The left motor sits on channel A (AIN1/AIN2/PWMA) and the right
//! motor on channel B (BIN1/BIN2/PWMB).

use serde::{Deserialize, Serialize};

use super::channel::HBridge;
use crate::utils::math::power::{Direction, Polarity, RangePolicy};

/// Wiring and input handling for a `Tb6612`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Polarity of the motor on channel A.
    pub left: Polarity,
    /// Polarity of the motor on channel B.
    pub right: Polarity,
    /// What to do with power outside `-255..=255`.
    pub range: RangePolicy,
}

/// Result of a drive request that did not hit a hardware error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// All four direction writes and both magnitude writes were issued.
    Applied,
    /// Input was out of range; nothing was written.
    Rejected,
}

/// TB6612FNG dual H-bridge driving a left and a right motor.
pub struct Tb6612<L, R> {
    left: L,
    right: R,
    config: DriverConfig,
}

impl<L, R> Tb6612<L, R>
where
    L: HBridge,
    R: HBridge<Error = L::Error>,
{
    /// Create a driver with normal polarity on both motors that rejects
    /// out-of-range power.
    pub fn new(
        left: L,
        right: R,
    ) -> Self {
        Self::with_config(left, right, DriverConfig::default())
    }

    /// Create a driver with explicit polarity and range handling.
    pub fn with_config(
        left: L,
        right: R,
        config: DriverConfig,
    ) -> Self {
        Tb6612 {
            left,
            right,
            config,
        }
    }

    /// Configuration the driver was built with.
    pub fn config(&self) -> DriverConfig {
        self.config
    }

    /// Set both motors from signed power values in `-255..=255`.
    ///
    /// Negative power runs a motor in reverse, zero stops it with forward
    /// direction and zero duty. If either value is out of range and the range
    /// policy is `Reject`, neither channel is touched and `Rejected` is returned.
    /// Within each channel the direction is written before the magnitude.
    pub fn set_drive_motors(
        &mut self,
        left_power: i32,
        right_power: i32,
    ) -> Result<DriveOutcome, L::Error> {
        let policy = self.config.range;
        let (Some((left_dir, left_mag)), Some((right_dir, right_mag))) =
            (policy.apply(left_power), policy.apply(right_power))
        else {
            tracing::debug!(left_power, right_power, "drive power out of range, ignored");
            return Ok(DriveOutcome::Rejected);
        };

        self.write_directions(left_dir, right_dir)?;
        self.left.set_magnitude(left_mag)?;
        self.right.set_magnitude(right_mag)?;

        tracing::trace!(left_power, right_power, "drive motors set");
        Ok(DriveOutcome::Applied)
    }

    /// Short-brake both motors.
    pub fn brake(&mut self) -> Result<(), L::Error> {
        self.left.short_brake()?;
        self.right.short_brake()
    }

    /// Let both motors spin down freely.
    pub fn coast(&mut self) -> Result<(), L::Error> {
        self.left.coast()?;
        self.right.coast()
    }

    /// Give back the two channels.
    pub fn release(self) -> (L, R) {
        (self.left, self.right)
    }

    fn write_directions(
        &mut self,
        left: Direction,
        right: Direction,
    ) -> Result<(), L::Error> {
        self.left.set_direction(left.wired(self.config.left))?;
        self.right.set_direction(right.wired(self.config.right))
    }
}
