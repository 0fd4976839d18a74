//! scanviz Core - Range Scan to Point-Cloud Marker Pipeline
//!
//! Turns one planar range scan into one renderable point-cloud marker:
//! 1. **Transform**: polar `(range, angle)` samples → sensor-frame points,
//!    index aligned with the input
//! 2. **Build**: points + fixed display style → `VisualizationMarker`
//! 3. **Handle**: per-scan orchestration against an explicit context
//!    (clock + marker sink)

pub mod transform;
pub mod marker;
pub mod handler;
pub mod node;
pub mod wire;
pub mod visualization;

// Re-export key types for convenience
pub use transform::ScanTransformer;
pub use marker::{MarkerBuilder, LASER_POINTS_STYLE};
pub use handler::{handle, HandlerContext, HandlerError, ScanHandler};
pub use node::{run_node, NodeConfig, NodeStats};
pub use wire::{decode_scan, encode_scan, WireError};
