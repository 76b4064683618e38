use std::{env, thread, time::Duration};

use bk1902b::{
    Bk1902b,
    config::DEFAULT_BAUD_RATE,
    error::Error,
    serial::{IoError, SerialTransport, StdDelay, with_bk1902b},
};
use inquire::Select;

// Configuration constants - adjust these for your setup
const CURRENT_LIMIT_A: f32 = 0.1;
const START_VOLTAGE_V: f32 = 1.0;
const SWEEP_OFFSET_V: f32 = 1.1;
// Sweep in 10mV steps, on top of SWEEP_OFFSET_V.
const SWEEP_STEPS: u32 = 700;
const STABILIZATION_DELAY: Duration = Duration::from_secs(10);
const STEP_DELAY: Duration = Duration::from_millis(600);

fn sweep(psu: &mut Bk1902b<SerialTransport, StdDelay>) -> Result<(), Error<IoError>> {
    println!("Resetting output");
    psu.disable_output()?;
    psu.set_current(CURRENT_LIMIT_A)?;
    psu.set_voltage(START_VOLTAGE_V)?;
    thread::sleep(STABILIZATION_DELAY);
    psu.enable_output()?;

    for step in 1..=SWEEP_STEPS {
        let target = SWEEP_OFFSET_V + step as f32 / 100.0;
        let setpoint = psu.set_voltage(target)?;
        thread::sleep(STEP_DELAY);

        let reading = psu.read_display()?;
        let mode = if reading.is_constant_voltage() { "CV" } else { "CC" };
        println!(
            "Voltage set to {:.2}V ({:.1}V sent). Measured: {:.2}V @ {:.2}A {}",
            target, setpoint.applied, reading.voltage, reading.current, mode
        );
    }

    psu.disable_output()?;
    Ok(())
}

fn main() {
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    if let Err(err) = with_bk1902b(&port_name, DEFAULT_BAUD_RATE, sweep) {
        eprintln!("Sweep failed: {}", err);
        std::process::exit(1);
    }
}
