//! Node runtime: drains the scan topic and hands every scan to the handler.
//!
//! # Usage
//!
//! ```ignore
//! use scanviz_core::node::{run_node, NodeConfig};
//! use scanviz_core::{HandlerContext, ScanHandler};
//! use scanviz_env::{marker_channel, scan_channel, TokioContext};
//!
//! let config = NodeConfig::default();
//! let (feed, source) = scan_channel(config.scan_qos);
//! let (sink, markers) = marker_channel(&config.marker_topic, config.marker_qos);
//! let handler = ScanHandler::new(HandlerContext::new(TokioContext::shared(), Arc::new(sink)));
//!
//! let stats = run_node(&config, &source, &handler).await;
//! ```

use crate::handler::ScanHandler;
use scanviz_env::{QosProfile, ScanSource};
use tracing::{info, warn};

/// Configuration for a scan-to-marker node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Node's logical name (for logging)
    pub name: String,
    
    /// Topic scans arrive on
    pub scan_topic: String,
    
    /// Topic markers are published on
    pub marker_topic: String,
    
    /// QoS of the scan subscription (default: best effort, depth 5)
    pub scan_qos: QosProfile,
    
    /// QoS of the marker publisher (default: reliable, depth 10)
    pub marker_qos: QosProfile,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "laser_scan_bf".to_string(),
            scan_topic: "/scan".to_string(),
            marker_topic: "/visualization_marker".to_string(),
            scan_qos: QosProfile::SENSOR_DATA,
            marker_qos: QosProfile::DEFAULT,
        }
    }
}

/// Outcome counters of a node run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Scans turned into a published marker
    pub handled: u64,
    /// Scans whose marker could not be published
    pub failed: u64,
}

impl NodeStats {
    pub fn total(&self) -> u64 {
        self.handled + self.failed
    }
}

/// Runs the node until the scan source closes.
///
/// Scans are processed strictly one at a time. A failing scan is logged
/// and counted; it never stops the loop.
pub async fn run_node<S>(config: &NodeConfig, source: &S, handler: &ScanHandler) -> NodeStats
where
    S: ScanSource + ?Sized,
{
    info!(
        "{}: {} -> {} (marker qos {:?}, depth {})",
        config.name,
        config.scan_topic,
        config.marker_topic,
        config.marker_qos.reliability,
        config.marker_qos.depth
    );
    
    let mut stats = NodeStats::default();
    
    while let Some(scan) = source.recv().await {
        match handler.on_scan(&scan) {
            Ok(()) => stats.handled += 1,
            Err(e) => {
                warn!("{}: dropping scan {}: {}", config.name, stats.total(), e);
                stats.failed += 1;
            }
        }
    }
    
    info!("{}: scan topic closed after {} scans ({} failed)", config.name, stats.total(), stats.failed);
    stats
}
