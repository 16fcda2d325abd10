//! PMSD (Particulate Matter Sensor Driver) Demo Application
//!
//! Feeds a simulated sensor byte stream through the receive kernel and
//! prints decoded measurements together with deferred diagnostics.

use clap::Parser;
use std::sync::mpsc;

use pmsd_core::Measurement;
use pmsd_link::sensor::{ControlLine, Pms5003};
use pmsd_link::traffic_generator::{TrafficConfig, TrafficGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 10)]
    frames: usize,

    /// Corrupt every Nth frame checksum (0 disables corruption)
    #[arg(short, long, default_value_t = 0)]
    corrupt_every: usize,

    /// Seed for the traffic generator (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// GPIO stub that reports level changes on stdout
struct ConsoleLine {
    name: &'static str,
    verbose: bool,
}

impl ControlLine for ConsoleLine {
    fn set_high(&mut self) {
        if self.verbose {
            println!("[gpio] {} -> high", self.name);
        }
    }

    fn set_low(&mut self) {
        if self.verbose {
            println!("[gpio] {} -> low", self.name);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!("PMSD (Particulate Matter Sensor Driver) Demo");
    println!("============================================");

    let config = TrafficConfig {
        frame_count: args.frames,
        max_gap_noise: 8,
        corrupt_every: args.corrupt_every,
    };
    let mut generator = match args.seed {
        Some(seed) => TrafficGenerator::with_seed(config, seed),
        None => TrafficGenerator::new(config),
    };
    let stream = generator.generate_stream();

    let (diag_tx, diag_rx) = mpsc::channel();
    let (records_tx, records_rx) = mpsc::channel::<Measurement>();

    let mut sensor = Pms5003::new(
        Box::new(ConsoleLine {
            name: "power",
            verbose: args.verbose,
        }),
        Box::new(ConsoleLine {
            name: "reset",
            verbose: args.verbose,
        }),
        Box::new(diag_tx),
    );

    let line = sensor.serial_config();
    println!(
        "Serial line: {} baud, {} data bits, {:?} parity, {} stop bits",
        line.baud_rate, line.data_bits, line.parity, line.stop_bits
    );
    println!("Simulating {} frames ({} bytes)...", args.frames, stream.len());

    sensor.enable(move |measurement| {
        let _ = records_tx.send(measurement);
    });
    sensor.on_bytes_received(&stream);
    sensor.disable();

    println!("\nDecoded measurements:");
    let mut decoded = 0usize;
    for measurement in records_rx.try_iter() {
        decoded += 1;
        let json = serde_json::to_string(&measurement).expect("serialize measurement");
        println!("  {json}");
    }

    let diagnostics: Vec<_> = diag_rx.try_iter().collect();
    if args.verbose {
        println!("\nDeferred diagnostics:");
        for event in &diagnostics {
            println!("  {event}");
        }
    }

    println!(
        "\n{} frames generated, {} decoded, {} diagnostic events",
        args.frames,
        decoded,
        diagnostics.len()
    );
}
