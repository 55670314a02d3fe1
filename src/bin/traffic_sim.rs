//! Desktop traffic light simulator.
//!
//! Runs the controller against a [`MockPort`] and the system clock, printing
//! the lights whenever they change and logging every event.
//!
//! # Usage
//!
//! ```bash
//! # Standard red / red+yellow / green / yellow sequence
//! cargo run --bin traffic_sim --features sim
//!
//! # Custom configuration
//! cargo run --bin traffic_sim --features sim -- config.json
//!
//! # Debug logging (phases, passes), -vv adds sense samples
//! cargo run --bin traffic_sim --features sim -- -v
//! ```
//!
//! `RUST_LOG` overrides the level chosen by `-v`/`-q`.
//!
//! The simulator exits once the cycle stops on its repetition limit while no
//! activity cycle is running; otherwise it runs until interrupted.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use traffic_light::hal::{MockPort, SystemClock};
use traffic_light::{parse_config, Event, Pattern, TrafficLight, TrafficLightConfig};

/// Main loop interval in milliseconds
const LOOP_INTERVAL_MS: u64 = 10;

/// Simulated light output pins (red, yellow, green)
const LIGHT_PINS: [u8; 3] = [2, 3, 4];

/// Traffic light simulator - run the controller against a mock port
#[derive(Parser, Debug)]
#[command(name = "traffic_sim")]
#[command(about = "Simulate a traffic light controller on the desktop", long_about = None)]
#[command(version)]
struct Args {
    /// JSON configuration file (default: standard four-phase sequence)
    #[arg(value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrafficLightConfig::standard(),
    };

    let mut light =
        TrafficLight::with_config(MockPort::new(), SystemClock::new(), LIGHT_PINS, &config)
            .map_err(|_| anyhow::anyhow!("mock port setup failed"))?;

    for event in Event::ALL {
        light.register_event(event, move || log::info!("event: {event}"));
    }

    if config.activity.is_some() {
        light.enable_activity_cycle();
    }
    light.enable_cycle();

    println!("Traffic light simulator ({} ms per pass)", config.pass_duration_ms());
    let mut shown = None;

    loop {
        light
            .update()
            .map_err(|_| anyhow::anyhow!("mock port failed"))?;

        let pattern = light.pattern();
        if shown != Some(pattern) {
            println!("{}", render(pattern));
            shown = Some(pattern);
        }

        if !light.is_cycle_enabled() && !light.is_activity_cycle_enabled() {
            println!("Cycle stopped after {} passes", light.cycle().repetitions_count());
            return Ok(());
        }

        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}

fn render(pattern: Pattern) -> String {
    let lamp = |on: bool, name: &str| {
        if on {
            format!("[{name}]")
        } else {
            String::from("[ ]")
        }
    };
    format!(
        "{} {} {}",
        lamp(pattern.red, "R"),
        lamp(pattern.yellow, "Y"),
        lamp(pattern.green, "G")
    )
}

fn load_config(path: &Path) -> anyhow::Result<TrafficLightConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let config = parse_config(&bytes)
        .ok_or_else(|| anyhow::anyhow!("{}: invalid configuration", path.display()))?;
    log::info!("loaded {} phases from {:?}", config.phases.len(), path);
    Ok(config)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
