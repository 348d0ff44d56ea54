// Connects to a heart rate monitor by address and prints every reading
// until interrupted.

use std::time::Duration;

use clap::Parser;
use systole::{Error, HeartRateMonitor, SessionConfig};

/// Stream heart rate readings from a Bluetooth LE monitor.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Device hardware address, e.g. DA:81:90:CB:F3:22
    #[arg(env = "SYSTOLE_ADDRESS")]
    address: String,

    /// Seconds to wait for the device to appear in scan results
    #[arg(long, default_value_t = 5)]
    scan_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = SessionConfig::parse(&args.address)?
        .scan_timeout(Duration::from_secs(args.scan_timeout));
    let mut monitor = HeartRateMonitor::new(config).await?;

    if let Err(why) = run(&mut monitor).await {
        match why {
            Error::AdapterUnavailable => eprintln!("Bluetooth is not available."),
            Error::LowEnergyUnsupported(_) => eprintln!("Bluetooth LE is not available."),
            why => eprintln!("Session failed: {why}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(monitor: &mut HeartRateMonitor) -> systole::MonitorResult<()> {
    let adapter = monitor.resolve_adapter().await?;
    println!("Found bluetooth adapter ({adapter})");

    monitor.connect().await?;
    println!(
        "Connected to: {}",
        monitor.device_name().unwrap_or("(unnamed device)")
    );

    monitor.resolve_service().await?;
    println!("Found Heart Rate service");

    monitor.resolve_characteristic().await?;
    println!("Found Heart Rate Measurement characteristic");

    monitor.subscribe().await?;
    println!("Subscribed to heart rate notifications");

    if let Ok(location) = monitor.body_sensor_location().await {
        println!("Sensor location: {location}");
    }

    let mut readings = monitor.readings().await?;
    println!("Listening... press Ctrl-C to exit.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            reading = readings.recv() => match reading {
                Some(reading) => println!("Heart Rate: {} bpm", reading.measurement().bpm()),
                None => {
                    eprintln!("Notification stream ended");
                    break;
                }
            },
        }
    }

    if let Err(why) = monitor.unsubscribe().await {
        eprintln!("Could not disable notifications: {why}");
    }
    if let Err(why) = monitor.disconnect().await {
        eprintln!("Could not disconnect cleanly: {why}");
    }

    Ok(())
}
