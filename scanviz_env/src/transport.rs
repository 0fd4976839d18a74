//! Topic transport abstraction for scanviz nodes.

use async_trait::async_trait;
use crate::error::EnvError;
use crate::messages::{RangeScan, VisualizationMarker};

/// Outbound marker topic.
///
/// # Implementations
///
/// - **Production**: bounded tokio channel (`ChannelSink`)
/// - **Visualization**: Rerun recording stream
/// - **Simulation**: in-memory recorder
///
/// # Returns
/// * `Ok(())` - Marker handed to the transport (fire-and-forget)
/// * `Err(EnvError)` - Immediate failure (queue full, consumer gone)
///
/// Implementations must not block: the handler calls `publish` inline.
pub trait MarkerSink: Send + Sync {
    fn publish(&self, marker: VisualizationMarker) -> Result<(), EnvError>;
}

/// Inbound scan topic.
///
/// # Packet Flow
///
/// ```text
/// Sensor driver              Transport                 Node
///   |                           |                        |
///   |-- offer(scan) ----------->|                        |
///   |                           |-- [drop if full] ----->|
///   |                           |                        |-- recv() -> scan
/// ```
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Receives the next scan.
    ///
    /// # Returns
    /// * `Some(scan)` - A scan was received
    /// * `None` - The feed was closed (shutdown)
    async fn recv(&self) -> Option<RangeScan>;
}
