//! Core environment context trait for scanviz nodes.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

/// The clock collaborator of a scan-handling node.
///
/// Abstracts the "real world" so the handler can stamp markers without
/// reaching for a global clock.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time` and the system clock
/// - **Simulation**: `SimContext` - virtual clock advanced by the harness
#[async_trait]
pub trait ScanVizContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    fn now(&self) -> Duration;
    
    /// Returns the wall-clock time used for marker header stamps.
    ///
    /// In simulation, this is derived from virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;
    
    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);
}
