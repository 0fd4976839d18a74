//! Production implementations backed by Tokio.

use crate::error::EnvError;
use crate::messages::{RangeScan, VisualizationMarker};
use crate::transport::{MarkerSink, ScanSource};
use crate::types::{QosProfile, Reliability};
use crate::ScanVizContext;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Production context backed by Tokio and the system clock.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
    
    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanVizContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
    
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
    
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Reliable marker publisher over a bounded channel.
pub struct ChannelSink {
    topic: String,
    qos: QosProfile,
    tx: mpsc::Sender<VisualizationMarker>,
}

/// Creates a marker topic with the given QoS.
///
/// Returns the publishing half and the consumer's receiver.
pub fn marker_channel(
    topic: impl Into<String>,
    qos: QosProfile,
) -> (ChannelSink, mpsc::Receiver<VisualizationMarker>) {
    let (tx, rx) = mpsc::channel(qos.depth.max(1));
    let sink = ChannelSink {
        topic: topic.into(),
        qos,
        tx,
    };
    (sink, rx)
}

impl ChannelSink {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl MarkerSink for ChannelSink {
    fn publish(&self, marker: VisualizationMarker) -> Result<(), EnvError> {
        match self.tx.try_send(marker) {
            Ok(()) => Ok(()),
            // Best-effort topics drop on overflow; reliable ones report it
            Err(TrySendError::Full(_)) if self.qos.reliability == Reliability::BestEffort => Ok(()),
            Err(TrySendError::Full(_)) => Err(EnvError::QueueFull(self.qos.depth)),
            Err(TrySendError::Closed(_)) => Err(EnvError::closed(&self.topic)),
        }
    }
}

/// Producer half of a scan topic, held by the sensor driver.
#[derive(Clone)]
pub struct ScanFeed {
    tx: mpsc::Sender<RangeScan>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half of a scan topic, held by the node.
pub struct ChannelSource {
    rx: tokio::sync::Mutex<mpsc::Receiver<RangeScan>>,
}

/// Creates a scan topic with the given QoS.
pub fn scan_channel(qos: QosProfile) -> (ScanFeed, ChannelSource) {
    let (tx, rx) = mpsc::channel(qos.depth.max(1));
    let feed = ScanFeed {
        tx,
        dropped: Arc::new(AtomicU64::new(0)),
    };
    let source = ChannelSource {
        rx: tokio::sync::Mutex::new(rx),
    };
    (feed, source)
}

impl ScanFeed {
    /// Offers a scan without waiting.
    ///
    /// Returns `false` if the scan was dropped (queue full or node gone).
    pub fn offer(&self, scan: RangeScan) -> bool {
        match self.tx.try_send(scan) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
    
    /// Sends a scan, waiting for queue space.
    ///
    /// Used when replaying recorded scans, where nothing may be lost.
    pub async fn send(&self, scan: RangeScan) -> Result<(), EnvError> {
        self.tx.send(scan).await.map_err(|_| EnvError::closed("scan feed"))
    }
    
    /// Number of scans queued but not yet received by the node.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
    
    /// Number of scans dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ScanSource for ChannelSource {
    async fn recv(&self) -> Option<RangeScan> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ColorRGBA, MarkerAction, MarkerStyle, MarkerType, Scale3};
    use crate::types::{Header, Time, TimeSpan};
    
    fn marker() -> VisualizationMarker {
        VisualizationMarker {
            header: Header::new("laser_link", Time::default()),
            style: MarkerStyle {
                ns: String::new(),
                id: 0,
                kind: MarkerType::Points,
                action: MarkerAction::Add,
                scale: Scale3 { x: 0.02, y: 0.02, z: 0.02 },
                color: ColorRGBA::WHITE,
                lifetime: TimeSpan::from_secs(2),
            },
            points: Vec::new(),
        }
    }
    
    #[tokio::test]
    async fn test_tokio_context_time() {
        let ctx = TokioContext::new();
        let t1 = ctx.now();
        ctx.sleep(Duration::from_millis(10)).await;
        let t2 = ctx.now();
        
        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }
    
    #[test]
    fn test_reliable_sink_reports_full_queue() {
        let qos = QosProfile { reliability: Reliability::Reliable, depth: 2 };
        let (sink, _rx) = marker_channel("/visualization_marker", qos);
        
        assert!(sink.publish(marker()).is_ok());
        assert!(sink.publish(marker()).is_ok());
        assert!(matches!(sink.publish(marker()), Err(EnvError::QueueFull(2))));
    }
    
    #[test]
    fn test_best_effort_sink_drops_silently() {
        let qos = QosProfile { reliability: Reliability::BestEffort, depth: 1 };
        let (sink, _rx) = marker_channel("/visualization_marker", qos);
        
        assert!(sink.publish(marker()).is_ok());
        assert!(sink.publish(marker()).is_ok());
    }
    
    #[test]
    fn test_sink_reports_closed_consumer() {
        let (sink, rx) = marker_channel("/visualization_marker", QosProfile::DEFAULT);
        drop(rx);
        
        let err = sink.publish(marker()).unwrap_err();
        assert!(matches!(err, EnvError::ChannelClosed(ref t) if t == "/visualization_marker"));
    }
    
    #[tokio::test]
    async fn test_scan_feed_drops_on_overflow() {
        let (feed, source) = scan_channel(QosProfile { reliability: Reliability::BestEffort, depth: 1 });
        
        assert!(feed.offer(RangeScan::default()));
        assert!(!feed.offer(RangeScan::default()));
        assert_eq!(feed.dropped(), 1);
        assert_eq!(feed.pending(), 1);
        
        drop(feed);
        assert!(source.recv().await.is_some());
        assert!(source.recv().await.is_none());
    }
}
