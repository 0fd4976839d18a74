//! scanviz Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" seams that let the scan pipeline run
//! against a live messaging runtime (tokio channels) or a deterministic
//! simulation without changing a line of the core.
//!
//! # Core Concept
//!
//! Everything outside the pure transform is intercepted:
//! - Time (`now()`, `system_time()`, `sleep()`)
//! - Inbound scans (`ScanSource::recv()`)
//! - Outbound markers (`MarkerSink::publish()`)
//!
//! The message records themselves (`RangeScan`, `VisualizationMarker`, ...)
//! live here too, since they are the shapes the transport carries.
//!
//! # Example
//!
//! ```ignore
//! use scanviz_env::{ScanSource, MarkerSink, ScanVizContext};
//!
//! async fn node_loop<S: ScanSource>(source: &S, sink: &dyn MarkerSink) {
//!     while let Some(scan) = source.recv().await {
//!         let marker = build_marker(&scan);
//!         if let Err(e) = sink.publish(marker) {
//!             report(e);
//!         }
//!     }
//! }
//! ```

mod context;
mod transport;
mod types;
mod messages;
mod error;
mod tokio_impl;

pub use context::ScanVizContext;
pub use transport::{MarkerSink, ScanSource};
pub use types::{Header, QosProfile, Reliability, Time, TimeSpan};
pub use messages::{
    ColorRGBA, MarkerAction, MarkerStyle, MarkerType, Point3, RangeScan, Scale3,
    VisualizationMarker,
};
pub use error::EnvError;
pub use tokio_impl::{marker_channel, scan_channel, ChannelSink, ChannelSource, ScanFeed, TokioContext};
