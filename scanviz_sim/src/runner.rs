//! Simulation runner - drives scans through a node on a virtual clock.
//!
//! The producer (sensor driver) and the node share one task and take turns:
//! the clock only advances once the node has taken the previous scan, so a
//! marker is stamped with the capture instant of its scan.

use crate::context::SimContext;
use crate::lidar::SimLidar;

use scanviz_core::{run_node, HandlerContext, NodeConfig, NodeStats, ScanHandler};
use scanviz_env::{scan_channel, MarkerSink, RangeScan, ScanVizContext, Time};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from configuring a simulation run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Rate is not positive, or its period does not fit a `Duration`
    #[error("Invalid sensor rate: {0} Hz")]
    InvalidRate(f64),
}

/// How the simulated driver hands scans to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Offer without waiting; scans are lost if the queue is full
    BestEffort,
    /// Wait for queue space; nothing is lost (log replay)
    Lossless,
}

/// Results from a simulation run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Handler outcome counters
    pub stats: NodeStats,
    
    /// Scans lost on the best-effort feed
    pub dropped: u64,
    
    /// Virtual time elapsed
    pub duration: Duration,
}

/// Runs scans through a node against a virtual clock.
pub struct SimRunner {
    context: Arc<SimContext>,
    node: NodeConfig,
    period: Duration,
}

impl SimRunner {
    /// Creates a runner publishing one scan every `period` of virtual time.
    pub fn new(context: Arc<SimContext>, node: NodeConfig, period: Duration) -> Self {
        Self { context, node, period }
    }
    
    /// Creates a runner for a sensor spinning at `rate_hz`.
    pub fn with_rate(context: Arc<SimContext>, node: NodeConfig, rate_hz: f64) -> Result<Self, RunnerError> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(RunnerError::InvalidRate(rate_hz));
        }
        let period = Duration::try_from_secs_f64(1.0 / rate_hz).map_err(|_| RunnerError::InvalidRate(rate_hz))?;
        Ok(Self::new(context, node, period))
    }
    
    /// Runs until `next_scan` returns `None`.
    ///
    /// `next_scan` is called once per period with the current virtual time
    /// and returns the scan the sensor captured at that instant.
    pub async fn run<F>(&self, mode: FeedMode, sink: Arc<dyn MarkerSink>, mut next_scan: F) -> RunReport
    where
        F: FnMut(Time) -> Option<RangeScan>,
    {
        let start = self.context.now();
        let (feed, source) = scan_channel(self.node.scan_qos);
        let handler = ScanHandler::new(HandlerContext::new(self.context.clone(), sink));
        
        let producer = async {
            let feed = feed;
            let mut produced = 0u64;
            
            loop {
                self.context.sleep(self.period).await;
                let Some(scan) = next_scan(Time::from(self.context.system_time())) else {
                    break;
                };
                
                match mode {
                    FeedMode::BestEffort => {
                        if !feed.offer(scan) {
                            debug!("Scan {} dropped: queue full", produced);
                        }
                    }
                    FeedMode::Lossless => {
                        if feed.send(scan).await.is_err() {
                            break;
                        }
                    }
                }
                produced += 1;
                
                // Let the node drain the queue before the next capture
                while feed.pending() > 0 {
                    tokio::task::yield_now().await;
                }
            }
            
            feed.dropped()
        };
        
        let (dropped, stats) = tokio::join!(producer, run_node(&self.node, &source, &handler));
        
        RunReport {
            stats,
            dropped,
            duration: self.context.now() - start,
        }
    }
    
    /// Runs `count` scans from a synthetic lidar over a best-effort feed.
    pub async fn run_lidar(&self, lidar: &mut SimLidar, count: usize, sink: Arc<dyn MarkerSink>) -> RunReport {
        let mut remaining = count;
        self.run(FeedMode::BestEffort, sink, |stamp| {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            Some(lidar.scan(stamp))
        })
        .await
    }
    
    /// Replays recorded scans without loss, keeping their contents as-is.
    pub async fn replay(&self, scans: Vec<RangeScan>, sink: Arc<dyn MarkerSink>) -> RunReport {
        let mut scans = scans.into_iter();
        self.run(FeedMode::Lossless, sink, |_| scans.next()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lidar::LidarConfig;
    use crate::recorder::RecordingSink;
    
    fn runner() -> SimRunner {
        SimRunner::with_rate(SimContext::shared(), NodeConfig::default(), 10.0).unwrap()
    }
    
    #[tokio::test]
    async fn test_lidar_run_publishes_every_scan() {
        let sink = RecordingSink::new();
        let mut lidar = SimLidar::new(LidarConfig::default(), 42);
        
        let report = runner().run_lidar(&mut lidar, 5, Arc::new(sink.clone())).await;
        
        assert_eq!(report.stats, NodeStats { handled: 5, failed: 0 });
        assert_eq!(report.dropped, 0);
        // Five captures plus the final tick that found no scan
        assert_eq!(report.duration, Duration::from_millis(600));
        
        let markers = sink.take();
        assert_eq!(markers.len(), 5);
        assert!(markers.iter().all(|m| m.points.len() == 360));
        assert_eq!(markers[0].header.stamp, Time::new(1704067200, 100_000_000));
        assert_eq!(markers[1].header.stamp, Time::new(1704067200, 200_000_000));
    }
    
    #[tokio::test]
    async fn test_runs_are_deterministic() {
        let a = RecordingSink::new();
        let b = RecordingSink::new();
        
        runner().run_lidar(&mut SimLidar::new(LidarConfig::default(), 3), 3, Arc::new(a.clone())).await;
        runner().run_lidar(&mut SimLidar::new(LidarConfig::default(), 3), 3, Arc::new(b.clone())).await;
        
        assert_eq!(a.take(), b.take());
    }
    
    #[tokio::test]
    async fn test_replay_keeps_going_after_publish_failure() {
        let sink = RecordingSink::bounded(2);
        let scans = (0..4)
            .map(|i| RangeScan::new("laser_link", Time::new(i, 0), 0.0, 0.1, vec![1.0; i as usize]))
            .collect();
        
        let report = runner().replay(scans, Arc::new(sink.clone())).await;
        
        assert_eq!(report.stats, NodeStats { handled: 2, failed: 2 });
        assert_eq!(sink.len(), 2);
    }
    
    #[test]
    fn test_with_rate_rejects_unusable_rates() {
        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e-20] {
            let result = SimRunner::with_rate(SimContext::shared(), NodeConfig::default(), rate);
            assert!(matches!(result, Err(RunnerError::InvalidRate(_))), "rate {rate} accepted");
        }
    }
    
    #[tokio::test]
    async fn test_very_slow_sensor_still_runs() {
        // One scan every ~31.7 years of virtual time
        let runner = SimRunner::with_rate(SimContext::shared(), NodeConfig::default(), 1e-9).unwrap();
        let sink = RecordingSink::new();
        let mut lidar = SimLidar::new(LidarConfig::default(), 7);
        
        let report = runner.run_lidar(&mut lidar, 2, Arc::new(sink.clone())).await;
        
        assert_eq!(report.stats.handled, 2);
        // Two captures plus the final tick, stamped past 2038
        assert_eq!(report.duration, runner.period * 3);
        assert!(sink.take().iter().all(|m| m.header.stamp.sec == i32::MAX));
    }
    
    #[tokio::test]
    async fn test_empty_replay() {
        let report = runner().replay(Vec::new(), Arc::new(RecordingSink::new())).await;
        assert_eq!(report.stats.total(), 0);
    }
}
