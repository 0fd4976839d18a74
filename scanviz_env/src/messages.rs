//! Message records carried over the scan and marker topics.
//!
//! Field names and enum numbering follow `sensor_msgs/LaserScan` and
//! `visualization_msgs/Marker`, so a marker serialized here is readable by
//! any consumer that already speaks those shapes.

use crate::types::{Header, Time, TimeSpan};
use serde::{Deserialize, Serialize};

/// One sampling cycle of a planar range sensor.
///
/// Immutable once received; only `header`, `angle_min`, `angle_increment`
/// and `ranges` take part in the point conversion. The remaining fields are
/// carried for wire compatibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeScan {
    pub header: Header,
    /// Start angle of the scan (rad)
    pub angle_min: f32,
    /// End angle of the scan (rad)
    pub angle_max: f32,
    /// Angular distance between measurements (rad)
    pub angle_increment: f32,
    /// Time between measurements (s)
    pub time_increment: f32,
    /// Time between scans (s)
    pub scan_time: f32,
    /// Minimum range value the sensor reports (m)
    pub range_min: f32,
    /// Maximum range value the sensor reports (m)
    pub range_max: f32,
    /// One distance per angular step; infinity means "no return"
    pub ranges: Vec<f32>,
    pub intensities: Vec<f32>,
}

impl RangeScan {
    /// Creates a scan from the fields the transform uses.
    ///
    /// `angle_max` is derived from the beam count; sensor limits are left open.
    pub fn new(
        frame_id: impl Into<String>,
        stamp: Time,
        angle_min: f32,
        angle_increment: f32,
        ranges: Vec<f32>,
    ) -> Self {
        let steps = ranges.len().saturating_sub(1) as f32;
        Self {
            header: Header::new(frame_id, stamp),
            angle_min,
            angle_max: angle_min + steps * angle_increment,
            angle_increment,
            time_increment: 0.0,
            scan_time: 0.0,
            range_min: 0.0,
            range_max: f32::INFINITY,
            ranges,
            intensities: Vec::new(),
        }
    }
    
    /// The sensor frame the ranges are measured in.
    pub fn frame_id(&self) -> &str {
        &self.header.frame_id
    }
    
    /// Capture time of the scan.
    pub fn timestamp(&self) -> Time {
        self.header.stamp
    }
    
    /// Number of range samples.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// A point in the sensor frame (m).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The sensor origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for nalgebra::Point3<f64> {
    fn from(p: Point3) -> Self {
        nalgebra::Point3::new(p.x, p.y, p.z)
    }
}

impl From<nalgebra::Point3<f64>> for Point3 {
    fn from(p: nalgebra::Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// Per-axis marker scale (m).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scale3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// RGBA color, each channel in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRGBA {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    
    /// Converts to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Geometry kind of a marker (wire value in parentheses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum MarkerType {
    Arrow,
    Cube,
    Sphere,
    Cylinder,
    LineStrip,
    LineList,
    CubeList,
    SphereList,
    /// (8) one square per point, sized by `scale.x`/`scale.y`
    Points,
    TextViewFacing,
    MeshResource,
    TriangleList,
}

impl From<MarkerType> for i32 {
    fn from(kind: MarkerType) -> i32 {
        match kind {
            MarkerType::Arrow => 0,
            MarkerType::Cube => 1,
            MarkerType::Sphere => 2,
            MarkerType::Cylinder => 3,
            MarkerType::LineStrip => 4,
            MarkerType::LineList => 5,
            MarkerType::CubeList => 6,
            MarkerType::SphereList => 7,
            MarkerType::Points => 8,
            MarkerType::TextViewFacing => 9,
            MarkerType::MeshResource => 10,
            MarkerType::TriangleList => 11,
        }
    }
}

impl TryFrom<i32> for MarkerType {
    type Error = String;
    
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => MarkerType::Arrow,
            1 => MarkerType::Cube,
            2 => MarkerType::Sphere,
            3 => MarkerType::Cylinder,
            4 => MarkerType::LineStrip,
            5 => MarkerType::LineList,
            6 => MarkerType::CubeList,
            7 => MarkerType::SphereList,
            8 => MarkerType::Points,
            9 => MarkerType::TextViewFacing,
            10 => MarkerType::MeshResource,
            11 => MarkerType::TriangleList,
            other => return Err(format!("unknown marker type {}", other)),
        })
    }
}

/// What the consumer should do with the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum MarkerAction {
    /// (0) create or replace the marker with this `ns`/`id`
    Add,
    /// (2)
    Delete,
    /// (3)
    DeleteAll,
}

impl From<MarkerAction> for i32 {
    fn from(action: MarkerAction) -> i32 {
        match action {
            MarkerAction::Add => 0,
            MarkerAction::Delete => 2,
            MarkerAction::DeleteAll => 3,
        }
    }
}

impl TryFrom<i32> for MarkerAction {
    type Error = String;
    
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            // MODIFY shares ADD's wire value
            0 => Ok(MarkerAction::Add),
            2 => Ok(MarkerAction::Delete),
            3 => Ok(MarkerAction::DeleteAll),
            other => Err(format!("unknown marker action {}", other)),
        }
    }
}

/// Display parameters of a marker, independent of its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub ns: String,
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: MarkerType,
    pub action: MarkerAction,
    pub scale: Scale3,
    pub color: ColorRGBA,
    /// How long the consumer keeps the marker without a refresh
    pub lifetime: TimeSpan,
}

/// A renderable point-cloud entity.
///
/// Serializes flat, with the style fields next to `header` and `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationMarker {
    pub header: Header,
    #[serde(flatten)]
    pub style: MarkerStyle,
    pub points: Vec<Point3>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_style() -> MarkerStyle {
        MarkerStyle {
            ns: String::new(),
            id: 0,
            kind: MarkerType::Points,
            action: MarkerAction::Add,
            scale: Scale3 { x: 0.02, y: 0.02, z: 0.02 },
            color: ColorRGBA::WHITE,
            lifetime: TimeSpan::from_secs(2),
        }
    }

    #[test]
    fn test_scan_accessors() {
        let scan = RangeScan::new("laser_link", Time::new(3, 4), 0.0, 0.5, vec![1.0, 2.0, 3.0]);
        assert_eq!(scan.frame_id(), "laser_link");
        assert_eq!(scan.timestamp(), Time::new(3, 4));
        assert_eq!(scan.len(), 3);
        assert!((scan.angle_max - 1.0).abs() < 1e-6);
        assert!(RangeScan::default().is_empty());
    }

    #[test]
    fn test_marker_type_wire_values() {
        assert_eq!(i32::from(MarkerType::Points), 8);
        assert_eq!(MarkerType::try_from(8), Ok(MarkerType::Points));
        assert!(MarkerType::try_from(42).is_err());
        assert_eq!(i32::from(MarkerAction::Add), 0);
        assert_eq!(MarkerAction::try_from(3), Ok(MarkerAction::DeleteAll));
    }

    #[test]
    fn test_marker_serializes_flat() {
        let marker = VisualizationMarker {
            header: Header::new("laser_link", Time::new(10, 0)),
            style: sample_style(),
            points: vec![Point3::new(1.0, 0.0, 0.0)],
        };
        
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["header"]["frame_id"], "laser_link");
        assert_eq!(json["ns"], "");
        assert_eq!(json["type"], 8);
        assert_eq!(json["action"], 0);
        assert_eq!(json["lifetime"]["sec"], 2);
        assert_eq!(json["points"][0]["x"], 1.0);
        
        let back: VisualizationMarker = serde_json::from_value(json).unwrap();
        assert_eq!(back, marker);
    }

    #[test]
    fn test_nalgebra_conversion() {
        let p = Point3::new(1.0, -2.0, 0.5);
        let na: nalgebra::Point3<f64> = p.into();
        assert_eq!(na.coords.norm_squared(), 5.25);
        assert_eq!(Point3::from(na), p);
    }

    #[test]
    fn test_color_to_rgba8() {
        assert_eq!(ColorRGBA::WHITE.to_rgba8(), [255, 255, 255, 255]);
        let c = ColorRGBA { r: 2.0, g: -1.0, b: 0.5, a: 1.0 };
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }
}
