//! Module Exports
//!
//! This file exports the motor control pieces of the drive core.
//!
//! - `channel`: one H-bridge channel (IN1/IN2 + PWM) over `embedded-hal`.
//! - `driver`: the dual-motor `Tb6612` dispatcher.
//!
//! It also defines the `DriveCommand` vocabulary, the `DRIVE_CHANNEL` they arrive
//! on and the `DriveController` that owns the driver and the STBY line.

pub mod channel;
pub mod driver;

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{ErrorType, OutputPin};
use serde::{Deserialize, Serialize};

pub use channel::{ChannelError, HBridge, MotorChannel};
pub use driver::{DriveOutcome, DriverConfig, Tb6612};

/// Channel used to receive drive commands (`DriveCommand` messages).
pub static DRIVE_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, DriveCommand, 16> =
    embassy_sync::channel::Channel::new();

/// Drive command variants.
///
/// Serialized as JSON with tag `"dc"`, e.g. `{"dc":"m","l":-100,"r":200}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "dc", rename_all = "snake_case")] // dc = drive command
pub enum DriveCommand {
    /// Set left and right motor power (`-255..=255`).
    M { l: i32, r: i32 },
    /// Short-brake both motors.
    Brake,
    /// Let both motors coast.
    Coast,
    /// Pull STBY high so the outputs follow the inputs.
    Enable,
    /// Pull STBY low, putting the outputs in high impedance.
    Disable,
}

/// Errors surfaced by the `DriveController`.
#[derive(Debug)]
pub enum ControlError<E: core::fmt::Debug, S: core::fmt::Debug> {
    Channel(E),
    Standby(S),
}

/// Stand-in STBY line for boards that wire STBY straight to VCC.
pub struct TiedHigh;

impl ErrorType for TiedHigh {
    type Error = Infallible;
}

impl OutputPin for TiedHigh {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct DriveController<L, R, S> {
    pub driver: Tb6612<L, R>,
    standby: Option<S>,
}

impl<L, R, S> DriveController<L, R, S>
where
    L: HBridge,
    R: HBridge<Error = L::Error>,
    S: OutputPin,
{
    pub fn new(
        driver: Tb6612<L, R>,
        standby: Option<S>,
    ) -> Self {
        DriveController { driver, standby }
    }

    /// Execute a single `DriveCommand`.
    ///
    /// Returns the drive outcome for `M` and `None` for the other commands.
    pub fn execute_command(
        &mut self,
        command: DriveCommand,
    ) -> Result<Option<DriveOutcome>, ControlError<L::Error, S::Error>> {
        match command {
            DriveCommand::M { l, r } => self
                .driver
                .set_drive_motors(l, r)
                .map(Some)
                .map_err(ControlError::Channel),
            DriveCommand::Brake => {
                self.driver.brake().map_err(ControlError::Channel)?;
                Ok(None)
            }
            DriveCommand::Coast => {
                self.driver.coast().map_err(ControlError::Channel)?;
                Ok(None)
            }
            DriveCommand::Enable => {
                self.enable()?;
                Ok(None)
            }
            DriveCommand::Disable => {
                self.disable()?;
                Ok(None)
            }
        }
    }

    /// Take the driver out of standby.
    pub fn enable(&mut self) -> Result<(), ControlError<L::Error, S::Error>> {
        match self.standby.as_mut() {
            Some(stby) => stby.set_high().map_err(ControlError::Standby),
            None => {
                tracing::warn!("enable requested but no STBY line configured");
                Ok(())
            }
        }
    }

    /// Put the driver into standby.
    pub fn disable(&mut self) -> Result<(), ControlError<L::Error, S::Error>> {
        match self.standby.as_mut() {
            Some(stby) => stby.set_low().map_err(ControlError::Standby),
            None => {
                tracing::warn!("disable requested but no STBY line configured");
                Ok(())
            }
        }
    }

    pub async fn drive_ch(&mut self) -> ! {
        loop {
            let command = DRIVE_CHANNEL.receiver().receive().await;
            tracing::info!("Received Drive Command: {:?}", command);
            match self.execute_command(command) {
                Ok(Some(DriveOutcome::Rejected)) => {
                    tracing::debug!(?command, "drive command out of range, outputs unchanged")
                }
                Ok(_) => tracing::info!("Drive command executed successfully"),
                Err(e) => tracing::error!("Drive command failed: {:?}", e),
            }
        }
    }
}
