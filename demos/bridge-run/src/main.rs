//! bridge-run — runs the fleet simulation against an external dispatch
//! optimizer.
//!
//! Loads a link network, a fleet and a demand file, binds the configured
//! endpoint and waits for the optimizer to connect.  Every simulation step
//! then performs one exchange; the run ends with a finalization message.
//!
//! ```text
//! RUST_LOG=debug bridge-run --network net.csv --fleet fleet.csv \
//!     --demand demand.csv --end-time 3600 --output output/run
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;

use fb_bridge::{BridgeEvent, BridgeObserver, ExchangeStats};
use fb_core::{format_hms, BridgeConfig};
use fb_network::{load_network_csv, BinnedTravelTime, DijkstraRouter, FreeSpeedTravelTime, TravelTime};
use fb_output::{CsvWriter, EventCsvWriter, EVENTS_FILE, EXCHANGES_FILE};
use fb_protocol::FramedListener;
use fb_schedule::{load_demand_csv, load_fleet_csv};
use fb_sim::SimBuilder;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Fleet simulation bridged to an external dispatch optimizer")]
struct Args {
    /// Link network CSV (`link_id,from_node,to_node,length_m,freespeed_mps`).
    #[arg(long)]
    network: PathBuf,

    /// Fleet CSV (`vehicle_id,start_link,capacity,service_begin,service_end`).
    #[arg(long)]
    fleet: PathBuf,

    /// Demand CSV (`request_id,origin_link,destination_link,submission_time,...`).
    #[arg(long)]
    demand: PathBuf,

    /// JSON bridge configuration.  Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Exclusive end of the run in seconds.
    #[arg(long)]
    end_time: Option<f64>,

    /// Seconds between exchanges.
    #[arg(long)]
    step: Option<f64>,

    /// Width of a congestion bin in seconds.  Needs `--congestion`.
    #[arg(long, requires = "congestion")]
    bin_secs: Option<f64>,

    /// Comma-separated free-speed multipliers, one per bin.
    #[arg(long, value_delimiter = ',', requires = "bin_secs")]
    congestion: Vec<f64>,

    /// Directory for `events.csv` and `exchanges.csv`.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ── Observer wrapper to count events ──────────────────────────────────────────

#[derive(Default)]
struct Totals {
    submitted:   usize,
    scheduled:   usize,
    rejected:    usize,
    picked_up:   usize,
    dropped_off: usize,
    queries:     usize,
    exchanges:   usize,
}

struct RunObserver {
    output: Option<EventCsvWriter>,
    totals: Totals,
}

impl BridgeObserver for RunObserver {
    fn on_event(&mut self, event: &BridgeEvent) {
        let counter = match event {
            BridgeEvent::RequestSubmitted { .. }    => &mut self.totals.submitted,
            BridgeEvent::RequestScheduled { .. }    => &mut self.totals.scheduled,
            BridgeEvent::RequestRejected { .. }     => &mut self.totals.rejected,
            BridgeEvent::PassengerPickedUp { .. }   => &mut self.totals.picked_up,
            BridgeEvent::PassengerDroppedOff { .. } => &mut self.totals.dropped_off,
        };
        *counter += 1;
        if let Some(out) = self.output.as_mut() {
            out.on_event(event);
        }
    }

    fn on_exchange(&mut self, now: f64, stats: &ExchangeStats) {
        self.totals.exchanges += 1;
        self.totals.queries += stats.queries_answered;
        if let Some(out) = self.output.as_mut() {
            out.on_exchange(now, stats);
        }
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<BridgeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => BridgeConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(end_time) = args.end_time {
        config.end_time = end_time;
    }
    if let Some(step) = args.step {
        config.step_secs = step;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn travel_time_model(args: &Args) -> Result<Box<dyn TravelTime>> {
    match args.bin_secs {
        Some(bin_secs) => {
            let model = BinnedTravelTime::new(bin_secs, args.congestion.clone())
                .context("invalid congestion profile")?;
            Ok(Box::new(model))
        }
        None => Ok(Box::new(FreeSpeedTravelTime)),
    }
}

fn open_output(dir: &Path) -> Result<EventCsvWriter> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let writer = CsvWriter::new(dir).with_context(|| format!("opening output in {}", dir.display()))?;
    Ok(EventCsvWriter::new(writer))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // 1. Configuration.
    let config = load_config(&args)?;
    println!("=== bridge-run ===");
    println!(
        "Run: {} → {}  |  step {} s  |  endpoint {}",
        format_hms(config.start_time),
        format_hms(config.end_time),
        config.step_secs,
        config.endpoint()
    );

    // 2. Network, fleet and demand.
    let network = load_network_csv(&args.network)
        .with_context(|| format!("loading network {}", args.network.display()))?;
    let fleet = load_fleet_csv(&args.fleet, &network)
        .with_context(|| format!("loading fleet {}", args.fleet.display()))?;
    let demand = load_demand_csv(&args.demand, &network)
        .with_context(|| format!("loading demand {}", args.demand.display()))?;
    println!(
        "Inputs: {} links  |  {} vehicles  |  {} requests",
        network.link_count(),
        fleet.len(),
        demand.len()
    );
    let travel_time = travel_time_model(&args)?;

    // 3. Output.
    let output = args.output.as_deref().map(open_output).transpose()?;
    let mut obs = RunObserver { output, totals: Totals::default() };

    // 4. Wait for the optimizer.
    let listener = FramedListener::bind(config.endpoint(), config.max_frame_bytes)
        .with_context(|| format!("binding {}", config.endpoint()))?;
    log::info!("waiting for the optimizer on {}", listener.local_addr()?);
    let stream = listener.accept().context("accepting the optimizer connection")?;
    if let Ok(peer) = stream.get_ref().peer_addr() {
        log::info!("optimizer connected from {peer}");
    }

    // 5. Build sim.
    let mut sim = SimBuilder::new(config, stream, Arc::new(network), DijkstraRouter)
        .fleet(fleet)
        .demand(demand)
        .travel_time(travel_time)
        .build()?;

    // 6. Run.
    let t0 = Instant::now();
    let result = sim.run(&mut obs);
    let elapsed = t0.elapsed();

    // 7. Flush output, also after a failed run.
    let mut output_failed = false;
    if let Some(out) = obs.output.as_mut() {
        out.finish();
        if let Some(e) = out.take_error() {
            eprintln!("output error: {e}");
            output_failed = true;
        }
    }

    let summary = result.context("simulation aborted")?;

    // 8. Summary.
    let t = &obs.totals;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  steps        : {}", summary.steps);
    println!("  final time   : {}", format_hms(summary.final_time));
    println!("  exchanges    : {} ({} travel-time queries)", t.exchanges, t.queries);
    println!("  submitted    : {}", t.submitted);
    println!("  scheduled    : {}", t.scheduled);
    println!("  rejected     : {}", t.rejected);
    println!("  picked up    : {}", t.picked_up);
    println!("  dropped off  : {}", t.dropped_off);
    if let Some(out) = &obs.output {
        println!("  {EVENTS_FILE:<13}: {} rows", out.rows_written());
        println!("  {EXCHANGES_FILE:<13}: {} rows", t.exchanges);
    }

    if output_failed {
        bail!("output was incomplete");
    }
    Ok(())
}
