//! scanviz CLI
//!
//! Runs the scan-to-marker node over synthetic lidar scans or a recorded
//! JSON-lines scan log, on a virtual clock.

use clap::Parser;
use scanviz_core::NodeConfig;
use scanviz_env::RangeScan;
use scanviz_sim::replay::{load_scan_log, save_scan_log};
use scanviz_sim::{FeedMode, LidarConfig, MarkerExport, RecordingSink, RunSummary, SimContext, SimLidar, SimRunner};
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Range scan to point-cloud marker simulator
#[derive(Parser, Debug)]
#[command(name = "scanviz")]
#[command(about = "Convert range scans into point-cloud markers on a virtual clock", long_about = None)]
struct Args {
    /// Seed for the synthetic lidar (noise and dropouts)
    #[arg(short, long, default_value = "42")]
    seed: u64,
    
    /// Number of synthetic scans to generate
    #[arg(short = 'n', long, default_value = "10")]
    scans: usize,
    
    /// Beams per synthetic scan
    #[arg(short, long, default_value = "360")]
    beams: usize,
    
    /// Sensor rate in Hz
    #[arg(short, long, default_value = "10")]
    rate: f64,
    
    /// Range noise standard deviation in meters
    #[arg(long, default_value = "0.01")]
    noise: f64,
    
    /// Probability that a beam returns nothing
    #[arg(long, default_value = "0.02")]
    dropout: f64,
    
    /// Sensor frame id of synthetic scans
    #[arg(long, default_value = "laser_link")]
    frame_id: String,
    
    /// Replay scans from a JSON-lines file instead of generating them
    #[arg(short, long)]
    input: Option<String>,
    
    /// Save the scans that were run to a JSON-lines file
    #[arg(long)]
    record: Option<String>,
    
    /// Export published markers to a JSON file
    #[arg(long)]
    export: Option<String>,
    
    /// Stream markers to a spawned Rerun viewer
    #[cfg(feature = "visualization")]
    #[arg(long)]
    rerun: bool,
    
    /// Verbose output (logs every published marker)
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON summary on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    
    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
    
    let node = NodeConfig::default();
    let runner = match SimRunner::with_rate(SimContext::shared(), node.clone(), args.rate) {
        Ok(runner) => runner,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    
    let sink = RecordingSink::new();
    #[cfg(feature = "visualization")]
    let sink = if args.rerun {
        match scanviz_core::visualization::RerunSink::new("scanviz") {
            Ok(viewer) => sink.with_mirror(Arc::new(viewer)),
            Err(e) => {
                warn!("Failed to initialize Rerun: {:?}", e);
                sink
            }
        }
    } else {
        sink
    };
    let mut ran: Vec<RangeScan> = Vec::new();
    let keep_scans = args.record.is_some();
    
    let (report, seed) = if let Some(input) = &args.input {
        let log = match load_scan_log(input) {
            Ok(log) => log,
            Err(e) => {
                error!("Failed to read {}: {}", input, e);
                std::process::exit(1);
            }
        };
        if !log.rejected.is_empty() {
            warn!("{} of {} lines in {} were rejected", log.rejected.len(), log.rejected.len() + log.scans.len(), input);
        }
        info!("Replaying {} scans from {}", log.scans.len(), input);
        
        if keep_scans {
            ran = log.scans.clone();
        }
        (runner.replay(log.scans, Arc::new(sink.clone())).await, None)
    } else {
        let config = LidarConfig {
            frame_id: args.frame_id.clone(),
            beams: args.beams,
            noise_std: args.noise,
            dropout_rate: args.dropout,
            ..Default::default()
        };
        let mut lidar = SimLidar::new(config, args.seed);
        let mut remaining = args.scans;
        info!("Generating {} scans ({} beams, seed={})", args.scans, args.beams, args.seed);
        
        let report = runner
            .run(FeedMode::BestEffort, Arc::new(sink.clone()), |stamp| {
                if remaining == 0 {
                    return None;
                }
                remaining -= 1;
                let scan = lidar.scan(stamp);
                if keep_scans {
                    ran.push(scan.clone());
                }
                Some(scan)
            })
            .await;
        (report, Some(args.seed))
    };
    
    if let Some(path) = &args.record {
        match save_scan_log(path, &ran) {
            Ok(()) => info!("Recorded {} scans to {}", ran.len(), path),
            Err(e) => error!("Failed to record scans: {}", e),
        }
    }
    
    let mut export = MarkerExport::new(RunSummary {
        node: node.name.clone(),
        seed,
        duration_sec: report.duration.as_secs_f64(),
        handled: report.stats.handled,
        failed: report.stats.failed,
        dropped: report.dropped,
    });
    for marker in sink.take() {
        export.add_marker(marker);
    }
    
    if let Some(path) = &args.export {
        match export.write_to_file(path) {
            Ok(()) => info!("Exported {} markers to {}", export.markers.len(), path),
            Err(e) => error!("Failed to write export: {:?}", e),
        }
    }
    
    if args.json {
        match serde_json::to_string_pretty(&export.summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else {
        info!(
            "{} markers published ({} points), {} failed, {} dropped over {:.2}s",
            report.stats.handled,
            export.point_count(),
            report.stats.failed,
            report.dropped,
            report.duration.as_secs_f64()
        );
    }
    
    if report.stats.failed > 0 {
        std::process::exit(1);
    }
}
