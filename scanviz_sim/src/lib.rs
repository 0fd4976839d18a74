//! scanviz Simulation Harness
//!
//! A controlled environment in which the scan-to-marker node runs
//! deterministically, without a live messaging runtime.
//!
//! # Core Principle
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: virtual clock advanced once per sensor period
//! - **Sensor**: synthetic lidar whose noise and dropouts derive from a seed
//! - **Transport**: in-process channels, markers collected by a recorder
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      SimRunner                        │
//! │  ┌──────────┐   scan feed   ┌──────────────────────┐  │
//! │  │ SimLidar │──────────────►│ run_node/ScanHandler │  │
//! │  │ or replay│  (best effort)│                      │  │
//! │  └──────────┘               └──────────┬───────────┘  │
//! │       ▲                                │ markers      │
//! │  ┌────┴──────┐                ┌────────▼────────┐     │
//! │  │SimContext │                │  RecordingSink  │     │
//! │  │ (clock)   │                └─────────────────┘     │
//! │  └───────────┘                                        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use scanviz_sim::{SimRunner, SimContext, SimLidar, LidarConfig, RecordingSink};
//!
//! let runner = SimRunner::with_rate(SimContext::shared(), NodeConfig::default(), 10.0)?;
//! let sink = RecordingSink::new();
//! let mut lidar = SimLidar::new(LidarConfig::default(), 42);
//! let report = runner.run_lidar(&mut lidar, 100, Arc::new(sink.clone())).await;
//! ```

mod context;
mod lidar;
mod recorder;
mod runner;
pub mod exporter;
pub mod replay;

pub use context::SimContext;
pub use lidar::{LidarConfig, Pillar, SimLidar};
pub use recorder::RecordingSink;
pub use runner::{FeedMode, RunReport, RunnerError, SimRunner};
pub use exporter::{MarkerExport, RunSummary};
