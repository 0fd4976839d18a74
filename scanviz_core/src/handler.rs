//! Per-scan orchestration: transform, build, publish.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    ScanHandler                       │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │ HandlerContext                                 │  │
//! │  │  • clock.system_time() → marker stamp          │  │
//! │  │  • sink.publish()      → marker topic          │  │
//! │  └────────────────────────────────────────────────┘  │
//! │                                                      │
//! │  RangeScan ─► ScanTransformer ─► MarkerBuilder ─► sink│
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retained between calls: every scan is handled on its own.

use crate::marker::MarkerBuilder;
use crate::transform::ScanTransformer;
use scanviz_env::{EnvError, MarkerSink, RangeScan, ScanVizContext, Time};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while handling a single scan.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The sink refused the marker; nothing was published.
    #[error("Failed to publish marker for frame '{frame_id}': {source}")]
    Publish {
        frame_id: String,
        #[source]
        source: EnvError,
    },
}

/// The external collaborators a handler talks to.
#[derive(Clone)]
pub struct HandlerContext {
    clock: Arc<dyn ScanVizContext>,
    sink: Arc<dyn MarkerSink>,
}

impl HandlerContext {
    pub fn new(clock: Arc<dyn ScanVizContext>, sink: Arc<dyn MarkerSink>) -> Self {
        Self { clock, sink }
    }
    
    pub fn clock(&self) -> &dyn ScanVizContext {
        self.clock.as_ref()
    }
    
    pub fn sink(&self) -> &dyn MarkerSink {
        self.sink.as_ref()
    }
}

/// Handles one scan: converts it to points, wraps them in a marker stamped
/// with the context's clock, and publishes the marker.
///
/// The marker's stamp is the handling time, not the scan's capture time.
/// On error the sink has not accepted anything, so the caller can move on
/// to the next scan.
pub fn handle(scan: &RangeScan, ctx: &HandlerContext) -> Result<(), HandlerError> {
    let points = ScanTransformer::new().transform(scan);
    let stamp = Time::from(ctx.clock().system_time());
    let marker = MarkerBuilder::new().build(points, scan.frame_id(), stamp);
    
    debug!(
        "Publishing marker: frame={} stamp={}.{:09} points={}",
        marker.header.frame_id,
        stamp.sec,
        stamp.nanosec,
        marker.points.len()
    );
    
    ctx.sink().publish(marker).map_err(|source| HandlerError::Publish {
        frame_id: scan.frame_id().to_string(),
        source,
    })
}

/// A handler bound to its context, invoked once per incoming scan.
pub struct ScanHandler {
    ctx: HandlerContext,
}

impl ScanHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }
    
    /// Handles a single scan. See [`handle`].
    pub fn on_scan(&self, scan: &RangeScan) -> Result<(), HandlerError> {
        handle(scan, &self.ctx)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use scanviz_env::{EnvError, MarkerSink, ScanVizContext, VisualizationMarker};
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    
    /// Clock frozen at a fixed instant.
    pub struct FixedClock(pub SystemTime);
    
    impl FixedClock {
        pub fn at_secs(secs: u64) -> Self {
            Self(UNIX_EPOCH + Duration::from_secs(secs))
        }
    }
    
    #[async_trait]
    impl ScanVizContext for FixedClock {
        fn now(&self) -> Duration {
            Duration::ZERO
        }
        
        fn system_time(&self) -> SystemTime {
            self.0
        }
        
        async fn sleep(&self, _duration: Duration) {}
    }
    
    /// Sink that records markers and can be told to fail.
    #[derive(Default)]
    pub struct RecordingSink {
        pub markers: Mutex<Vec<VisualizationMarker>>,
        pub fail_next: Mutex<usize>,
    }
    
    impl MarkerSink for RecordingSink {
        fn publish(&self, marker: VisualizationMarker) -> Result<(), EnvError> {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail > 0 {
                *fail -= 1;
                return Err(EnvError::QueueFull(10));
            }
            self.markers.lock().unwrap().push(marker);
            Ok(())
        }
    }
}
