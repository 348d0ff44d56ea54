// Logs heart rate readings as CSV rows, ready for a spreadsheet or
// gnuplot. RR-intervals are reported in milliseconds, semicolon-joined
// when a notification carries more than one.

use clap::Parser;
use log::warn;
use systole::{HeartRateMonitor, SessionConfig};

/// Record heart rate readings from a Bluetooth LE monitor as CSV.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Device hardware address, e.g. DA:81:90:CB:F3:22
    #[arg(env = "SYSTOLE_ADDRESS")]
    address: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = SessionConfig::parse(&args.address)?;
    let mut monitor = HeartRateMonitor::new(config).await?;

    monitor.resolve_adapter().await?;
    monitor.connect().await?;
    monitor.resolve_service().await?;
    monitor.resolve_characteristic().await?;
    monitor.subscribe().await?;

    let mut readings = monitor.readings().await?;
    println!("time,bpm,rr_ms");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            reading = readings.recv() => {
                let Some(reading) = reading else {
                    warn!("notification stream ended");
                    break;
                };

                let rr = reading
                    .measurement()
                    .rr_millis()
                    .map(|rr| {
                        rr.iter()
                            .map(|ms| ms.to_string())
                            .collect::<Vec<_>>()
                            .join(";")
                    })
                    .unwrap_or_default();
                println!(
                    "{},{},{}",
                    reading.received_at().to_rfc3339(),
                    reading.measurement().bpm(),
                    rr
                );
            }
        }
    }

    if let Err(why) = monitor.unsubscribe().await {
        warn!("could not disable notifications: {why}");
    }
    if let Err(why) = monitor.disconnect().await {
        warn!("could not disconnect cleanly: {why}");
    }

    Ok(())
}
