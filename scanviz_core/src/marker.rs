//! Assembly of the point-cloud marker.

use scanviz_env::{
    ColorRGBA, Header, MarkerAction, MarkerStyle, MarkerType, Point3, Scale3, Time, TimeSpan,
    VisualizationMarker,
};

/// Style of the laser point cloud: small opaque white squares that expire
/// after two seconds unless refreshed by the next scan.
pub const LASER_POINTS_STYLE: MarkerStyle = MarkerStyle {
    ns: String::new(),
    id: 0,
    kind: MarkerType::Points,
    action: MarkerAction::Add,
    scale: Scale3 { x: 0.02, y: 0.02, z: 0.02 },
    color: ColorRGBA::WHITE,
    lifetime: TimeSpan::from_secs(2),
};

/// Wraps a point sequence into a renderable marker.
///
/// The style is fixed; only the header and points vary between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerBuilder;

impl MarkerBuilder {
    pub fn new() -> Self {
        Self
    }
    
    /// Builds a marker from `points`, stamped with `frame_id` and `stamp`.
    ///
    /// Points are taken as-is: an empty vector yields a legal marker that
    /// carries no samples.
    pub fn build(&self, points: Vec<Point3>, frame_id: &str, stamp: Time) -> VisualizationMarker {
        VisualizationMarker {
            header: Header::new(frame_id, stamp),
            style: LASER_POINTS_STYLE,
            points,
        }
    }
}
