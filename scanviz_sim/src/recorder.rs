//! In-memory marker sink for simulation runs.

use scanviz_env::{EnvError, MarkerSink, VisualizationMarker};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Marker sink that keeps every published marker.
///
/// Clones share the same buffer, so the harness can hand one clone to the
/// handler and read results from another.
#[derive(Clone, Default)]
pub struct RecordingSink {
    markers: Arc<Mutex<Vec<VisualizationMarker>>>,
    
    /// Reject publishes once this many markers are held
    capacity: Option<usize>,
    
    /// Receives a copy of every recorded marker (e.g. a live viewer)
    mirror: Option<Arc<dyn MarkerSink>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Creates a sink that fails with `QueueFull` once `capacity` markers
    /// have been recorded.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }
    
    /// Forwards each recorded marker to `mirror` as it is published.
    ///
    /// Mirror failures are logged and do not fail the publish.
    pub fn with_mirror(mut self, mirror: Arc<dyn MarkerSink>) -> Self {
        self.mirror = Some(mirror);
        self
    }
    
    /// Number of markers recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    
    /// Removes and returns all recorded markers.
    pub fn take(&self) -> Vec<VisualizationMarker> {
        std::mem::take(&mut *self.lock())
    }
    
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<VisualizationMarker>> {
        self.markers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MarkerSink for RecordingSink {
    fn publish(&self, marker: VisualizationMarker) -> Result<(), EnvError> {
        let mut markers = self.lock();
        if let Some(capacity) = self.capacity {
            if markers.len() >= capacity {
                return Err(EnvError::QueueFull(capacity));
            }
        }
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.publish(marker.clone()) {
                warn!("Mirror publish failed: {}", e);
            }
        }
        markers.push(marker);
        Ok(())
    }
}
