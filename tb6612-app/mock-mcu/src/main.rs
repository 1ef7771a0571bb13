use clap::Parser;
use core::convert::Infallible;
use embassy_executor::{Executor, Spawner};
use embedded_hal::{
    digital::{self, OutputPin},
    pwm::{self, SetDutyCycle},
};
use std::{io::BufRead, path::PathBuf, time::Duration};
use tb6612_core::mk_static;
use tb6612_core::utils::controllers::{
    DriveCommand, DriveController, DriverConfig, MotorChannel, Tb6612, DRIVE_CHANNEL,
};
use tb6612_core::utils::math::power::{Polarity, RangePolicy};
use tracing::{error, info};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// JSON driver config file, e.g. {"left":"inverted","range":"clamp"}
    #[clap(long)]
    config: Option<PathBuf>,
    /// left motor is wired with negative polarity
    #[clap(long)]
    invert_left: bool,
    /// right motor is wired with negative polarity
    #[clap(long)]
    invert_right: bool,
    /// clamp out-of-range power instead of ignoring the command
    #[clap(long)]
    clamp: bool,
    /// PWM resolution of the simulated outputs
    #[clap(long, default_value_t = 255)]
    max_duty: u16,
}

/// Output pin that logs every level it is driven to.
struct LogPin(&'static str);

impl digital::ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        info!(pin = self.0, "LOW");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        info!(pin = self.0, "HIGH");
        Ok(())
    }
}

/// PWM output that logs every duty cycle it is set to.
struct LogPwm {
    name: &'static str,
    max_duty: u16,
}

impl pwm::ErrorType for LogPwm {
    type Error = Infallible;
}

impl SetDutyCycle for LogPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        info!(pin = self.name, duty, max = self.max_duty, "PWM");
        Ok(())
    }
}

type LogChannel = MotorChannel<LogPin, LogPin, LogPwm>;

#[embassy_executor::task]
async fn drive_task(mut ctrl: DriveController<LogChannel, LogChannel, LogPin>) -> ! {
    ctrl.drive_ch().await
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner, config: DriverConfig, max_duty: u16) {
    let channel = |in1: &'static str, in2: &'static str, pwm: &'static str| {
        MotorChannel::new(LogPin(in1), LogPin(in2), LogPwm { name: pwm, max_duty })
    };
    let driver = Tb6612::with_config(
        channel("AIN1", "AIN2", "PWMA"),
        channel("BIN1", "BIN2", "PWMB"),
        config,
    );
    let mut ctrl = DriveController::new(driver, Some(LogPin("STBY")));
    if let Err(e) = ctrl.enable() {
        error!("Failed to leave standby: {:?}", e);
    }
    spawner.spawn(drive_task(ctrl)).unwrap();

    std::thread::spawn(read_commands);
    info!(?config, "Reading drive commands from stdin, one JSON object per line");
}

/// Forward JSON lines from stdin to `DRIVE_CHANNEL` until EOF, then exit once the
/// queue has drained.
fn read_commands() {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!(?error, "error reading stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<DriveCommand>(&line) {
            Ok(command) => embassy_futures::block_on(DRIVE_CHANNEL.send(command)),
            Err(error) => error!(?error, %line, "error deserializing DriveCommand"),
        }
    }

    while !DRIVE_CHANNEL.is_empty() {
        std::thread::sleep(Duration::from_millis(10));
    }
    std::thread::sleep(Duration::from_millis(50));
    info!("stdin closed, shutting down");
    std::process::exit(0);
}

fn driver_config(opts: &Opts) -> Result<DriverConfig, Box<dyn std::error::Error>> {
    let mut config = match &opts.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DriverConfig::default(),
    };
    if opts.invert_left {
        config.left = Polarity::Inverted;
    }
    if opts.invert_right {
        config.right = Polarity::Inverted;
    }
    if opts.clamp {
        config.range = RangePolicy::Clamp;
    }
    Ok(config)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let config = match driver_config(&opts) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid driver config: {}", e);
            std::process::exit(2);
        }
    };

    let executor = mk_static!(Executor, Executor::new());
    executor.run(|spawner| {
        spawner
            .spawn(main_task(spawner, config, opts.max_duty))
            .unwrap();
    });
}
