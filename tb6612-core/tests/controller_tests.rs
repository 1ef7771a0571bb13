use embedded_hal_mock::eh1::{
    digital::{Mock as PinMock, State, Transaction as PinTrans},
    pwm::{Mock as PwmMock, Transaction as PwmTrans},
};
use tb6612_core::utils::controllers::{
    DriveCommand, DriveController, DriveOutcome, DriverConfig, MotorChannel, Tb6612, TiedHigh,
    DRIVE_CHANNEL,
};
use tb6612_core::utils::math::power::{Polarity, RangePolicy};

#[test]
fn drive_commands_from_json() {
    let cases = [
        (r#"{"dc":"m","l":-100,"r":200}"#, DriveCommand::M { l: -100, r: 200 }),
        (r#"{"dc":"brake"}"#, DriveCommand::Brake),
        (r#"{"dc":"coast"}"#, DriveCommand::Coast),
        (r#"{"dc":"enable"}"#, DriveCommand::Enable),
        (r#"{"dc":"disable"}"#, DriveCommand::Disable),
    ];
    for (json, expected) in cases {
        assert_eq!(serde_json::from_str::<DriveCommand>(json).unwrap(), expected);
    }
    assert!(serde_json::from_str::<DriveCommand>(r#"{"dc":"m","l":1}"#).is_err());
    assert!(serde_json::from_str::<DriveCommand>(r#"{"dc":"fly"}"#).is_err());
}

#[test]
fn large_json_power_reaches_range_policy() {
    let command: DriveCommand = serde_json::from_str(r#"{"dc":"m","l":40000,"r":0}"#).unwrap();
    assert_eq!(command, DriveCommand::M { l: 40000, r: 0 });

    // reject: nothing is written on either channel
    let mut idle: Vec<PinMock> = (0..4).map(|_| PinMock::new(&[])).collect();
    let mut idle_pwm: Vec<PwmMock> = (0..2).map(|_| PwmMock::new(&[])).collect();
    let driver = Tb6612::new(
        MotorChannel::new(idle[0].clone(), idle[1].clone(), idle_pwm[0].clone()),
        MotorChannel::new(idle[2].clone(), idle[3].clone(), idle_pwm[1].clone()),
    );
    let mut ctrl = DriveController::new(driver, None::<TiedHigh>);
    assert_eq!(ctrl.execute_command(command).unwrap(), Some(DriveOutcome::Rejected));
    idle.iter_mut().for_each(|p| p.done());
    idle_pwm.iter_mut().for_each(|p| p.done());

    // clamp: left saturates to full forward, right stays stopped
    let mut ain1 = PinMock::new(&[PinTrans::set(State::High)]);
    let mut ain2 = PinMock::new(&[PinTrans::set(State::Low)]);
    let mut pwma = PwmMock::new(&[
        PwmTrans::max_duty_cycle(255),
        PwmTrans::set_duty_cycle(255),
    ]);
    let mut bin1 = PinMock::new(&[PinTrans::set(State::High)]);
    let mut bin2 = PinMock::new(&[PinTrans::set(State::Low)]);
    let mut pwmb = PwmMock::new(&[
        PwmTrans::max_duty_cycle(255),
        PwmTrans::set_duty_cycle(0),
    ]);
    let config = DriverConfig {
        range: RangePolicy::Clamp,
        ..DriverConfig::default()
    };
    let driver = Tb6612::with_config(
        MotorChannel::new(ain1.clone(), ain2.clone(), pwma.clone()),
        MotorChannel::new(bin1.clone(), bin2.clone(), pwmb.clone()),
        config,
    );
    let mut ctrl = DriveController::new(driver, None::<TiedHigh>);
    assert_eq!(ctrl.execute_command(command).unwrap(), Some(DriveOutcome::Applied));

    for pin in [&mut ain1, &mut ain2, &mut bin1, &mut bin2] {
        pin.done();
    }
    pwma.done();
    pwmb.done();
}

#[test]
fn driver_config_from_partial_json() {
    let config: DriverConfig = serde_json::from_str(r#"{"left":"inverted"}"#).unwrap();
    assert_eq!(config.left, Polarity::Inverted);
    assert_eq!(config.right, Polarity::Normal);
    assert_eq!(config.range, RangePolicy::Reject);

    let config: DriverConfig = serde_json::from_str(r#"{"range":"clamp"}"#).unwrap();
    assert_eq!(config.range, RangePolicy::Clamp);
}

#[test]
fn controller_dispatches_motor_and_standby_commands() {
    let mut ain1 = PinMock::new(&[PinTrans::set(State::Low)]);
    let mut ain2 = PinMock::new(&[PinTrans::set(State::High)]);
    let mut pwma = PwmMock::new(&[
        PwmTrans::max_duty_cycle(255),
        PwmTrans::set_duty_cycle(100),
    ]);
    let mut bin1 = PinMock::new(&[PinTrans::set(State::High)]);
    let mut bin2 = PinMock::new(&[PinTrans::set(State::Low)]);
    let mut pwmb = PwmMock::new(&[
        PwmTrans::max_duty_cycle(255),
        PwmTrans::set_duty_cycle(200),
    ]);
    let mut stby = PinMock::new(&[PinTrans::set(State::High), PinTrans::set(State::Low)]);

    let driver = Tb6612::new(
        MotorChannel::new(ain1.clone(), ain2.clone(), pwma.clone()),
        MotorChannel::new(bin1.clone(), bin2.clone(), pwmb.clone()),
    );
    let mut ctrl = DriveController::new(driver, Some(stby.clone()));

    assert_eq!(ctrl.execute_command(DriveCommand::Enable).unwrap(), None);
    assert_eq!(
        ctrl.execute_command(DriveCommand::M { l: -100, r: 200 }).unwrap(),
        Some(DriveOutcome::Applied)
    );
    // rejected input leaves every line alone
    assert_eq!(
        ctrl.execute_command(DriveCommand::M { l: 300, r: 0 }).unwrap(),
        Some(DriveOutcome::Rejected)
    );
    assert_eq!(ctrl.execute_command(DriveCommand::Disable).unwrap(), None);

    for pin in [&mut ain1, &mut ain2, &mut bin1, &mut bin2, &mut stby] {
        pin.done();
    }
    pwma.done();
    pwmb.done();
}

#[test]
fn controller_without_standby_line() {
    let mut pins: Vec<PinMock> = (0..4).map(|_| PinMock::new(&[])).collect();
    let mut pwms: Vec<PwmMock> = (0..2).map(|_| PwmMock::new(&[])).collect();

    let driver = Tb6612::new(
        MotorChannel::new(pins[0].clone(), pins[1].clone(), pwms[0].clone()),
        MotorChannel::new(pins[2].clone(), pins[3].clone(), pwms[1].clone()),
    );
    let mut ctrl = DriveController::new(driver, None::<TiedHigh>);

    assert!(ctrl.execute_command(DriveCommand::Enable).is_ok());
    assert!(ctrl.execute_command(DriveCommand::Disable).is_ok());

    pins.iter_mut().for_each(|p| p.done());
    pwms.iter_mut().for_each(|p| p.done());
}

#[test]
fn drive_channel_queues_commands() {
    DRIVE_CHANNEL.try_send(DriveCommand::Brake).unwrap();
    DRIVE_CHANNEL
        .try_send(DriveCommand::M { l: 0, r: 0 })
        .unwrap();
    assert_eq!(DRIVE_CHANNEL.try_receive().unwrap(), DriveCommand::Brake);
    assert_eq!(
        DRIVE_CHANNEL.try_receive().unwrap(),
        DriveCommand::M { l: 0, r: 0 }
    );
    assert!(DRIVE_CHANNEL.try_receive().is_err());
}
