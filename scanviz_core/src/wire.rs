//! JSON wire codec for scans and markers.
//!
//! This is the boundary where loosely shaped external messages become typed
//! records. JSON has no representation for infinity or NaN, so range samples
//! are accepted as a number, `null` (no return), or one of the tokens
//! `"inf"`, `"-inf"`, `"nan"`.
//!
//! Example scan:
//!
//! ```text
//! {"header": {"frame_id": "laser_link", "stamp": {"sec": 12, "nanosec": 0}},
//!  "angle_min": 0.0, "angle_increment": 1.5707964,
//!  "ranges": [1.0, "inf"]}
//! ```

use scanviz_env::{Header, RangeScan, Time, VisualizationMarker};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding or encoding wire messages.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    
    #[error("Invalid range at index {index}: {value:?}")]
    InvalidRange { index: usize, value: String },
    
    #[error("Invalid range_max: {0:?}")]
    InvalidRangeMax(String),
    
    #[error("Non-finite {field}: {value}")]
    NonFiniteAngle { field: &'static str, value: f32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct WireHeader {
    frame_id: String,
    #[serde(default)]
    stamp: Time,
}

/// A range sample as it may appear on the wire.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum WireRange {
    Value(f32),
    Token(String),
    Missing(()),
}

impl WireRange {
    fn encode(range: f32) -> Self {
        if range.is_nan() {
            WireRange::Token("nan".to_string())
        } else if range == f32::INFINITY {
            WireRange::Token("inf".to_string())
        } else if range == f32::NEG_INFINITY {
            WireRange::Token("-inf".to_string())
        } else {
            WireRange::Value(range)
        }
    }
    
    /// Returns the sample, or the unrecognized token.
    fn decode(self) -> Result<f32, String> {
        match self {
            WireRange::Value(v) => Ok(v),
            WireRange::Missing(()) => Ok(f32::INFINITY),
            WireRange::Token(token) => match token.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Ok(f32::INFINITY),
                "-inf" | "-infinity" => Ok(f32::NEG_INFINITY),
                "nan" => Ok(f32::NAN),
                _ => Err(token),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireScan {
    header: WireHeader,
    angle_min: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    angle_max: Option<f32>,
    angle_increment: f32,
    #[serde(default)]
    time_increment: f32,
    #[serde(default)]
    scan_time: f32,
    #[serde(default)]
    range_min: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range_max: Option<WireRange>,
    ranges: Vec<WireRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    intensities: Vec<f32>,
}

/// Decodes a JSON scan, validating it at the boundary.
///
/// Rejects missing fields, unparseable range tokens, and non-finite
/// `angle_min` / `angle_increment`. Geometric plausibility of the angles is
/// not checked.
pub fn decode_scan(json: &str) -> Result<RangeScan, WireError> {
    let wire: WireScan = serde_json::from_str(json)?;
    
    for (field, value) in [("angle_min", wire.angle_min), ("angle_increment", wire.angle_increment)] {
        if !value.is_finite() {
            return Err(WireError::NonFiniteAngle { field, value });
        }
    }
    
    let ranges = wire.ranges
        .into_iter()
        .enumerate()
        .map(|(index, r)| r.decode().map_err(|value| WireError::InvalidRange { index, value }))
        .collect::<Result<Vec<_>, _>>()?;
    
    let range_max = match wire.range_max {
        Some(r) => r.decode().map_err(WireError::InvalidRangeMax)?,
        None => f32::INFINITY,
    };
    
    let mut scan = RangeScan::new(
        wire.header.frame_id,
        wire.header.stamp,
        wire.angle_min,
        wire.angle_increment,
        ranges,
    );
    if let Some(angle_max) = wire.angle_max {
        scan.angle_max = angle_max;
    }
    scan.time_increment = wire.time_increment;
    scan.scan_time = wire.scan_time;
    scan.range_min = wire.range_min;
    scan.range_max = range_max;
    scan.intensities = wire.intensities;
    
    Ok(scan)
}

/// Encodes a scan as a single JSON line.
pub fn encode_scan(scan: &RangeScan) -> Result<String, WireError> {
    let Header { frame_id, stamp } = scan.header.clone();
    let wire = WireScan {
        header: WireHeader { frame_id, stamp },
        angle_min: scan.angle_min,
        angle_max: Some(scan.angle_max),
        angle_increment: scan.angle_increment,
        time_increment: scan.time_increment,
        scan_time: scan.scan_time,
        range_min: scan.range_min,
        range_max: Some(WireRange::encode(scan.range_max)),
        ranges: scan.ranges.iter().map(|&r| WireRange::encode(r)).collect(),
        intensities: scan.intensities.clone(),
    };
    Ok(serde_json::to_string(&wire)?)
}

/// Encodes a marker as a single JSON line.
pub fn encode_marker(marker: &VisualizationMarker) -> Result<String, WireError> {
    Ok(serde_json::to_string(marker)?)
}

/// Decodes a JSON marker.
pub fn decode_marker(json: &str) -> Result<VisualizationMarker, WireError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{MarkerBuilder, LASER_POINTS_STYLE};
    use scanviz_env::Point3;
    
    #[test]
    fn test_decode_minimal_scan() {
        let scan = decode_scan(
            r#"{"header": {"frame_id": "laser_link"}, "angle_min": 0.0, "angle_increment": 0.5, "ranges": [1, 2.5]}"#,
        ).unwrap();
        
        assert_eq!(scan.frame_id(), "laser_link");
        assert_eq!(scan.timestamp(), Time::default());
        assert_eq!(scan.ranges, vec![1.0, 2.5]);
        assert!((scan.angle_max - 0.5).abs() < 1e-6);
        assert_eq!(scan.range_max, f32::INFINITY);
    }
    
    #[test]
    fn test_decode_non_finite_tokens() {
        let scan = decode_scan(
            r#"{"header": {"frame_id": "l", "stamp": {"sec": 3, "nanosec": 9}},
                "angle_min": 0.0, "angle_increment": 0.1,
                "ranges": [null, "inf", "-inf", "NaN", 4.0]}"#,
        ).unwrap();
        
        assert_eq!(scan.timestamp(), Time::new(3, 9));
        assert_eq!(scan.ranges[0], f32::INFINITY);
        assert_eq!(scan.ranges[1], f32::INFINITY);
        assert_eq!(scan.ranges[2], f32::NEG_INFINITY);
        assert!(scan.ranges[3].is_nan());
        assert_eq!(scan.ranges[4], 4.0);
    }
    
    #[test]
    fn test_decode_rejects_bad_token() {
        let err = decode_scan(
            r#"{"header": {"frame_id": "l"}, "angle_min": 0.0, "angle_increment": 0.1, "ranges": [1.0, "far"]}"#,
        ).unwrap_err();
        
        assert!(matches!(err, WireError::InvalidRange { index: 1, ref value } if value == "far"));
    }
    
    #[test]
    fn test_decode_rejects_missing_fields() {
        let err = decode_scan(r#"{"header": {"frame_id": "l"}, "ranges": []}"#).unwrap_err();
        assert!(matches!(err, WireError::Json(_)));
        
        let err = decode_scan(r#"{"angle_min": 0.0, "angle_increment": 0.1, "ranges": []}"#).unwrap_err();
        assert!(matches!(err, WireError::Json(_)));
    }
    
    #[test]
    fn test_decode_rejects_non_finite_angle() {
        // 1e39 does not fit in an f32 and widens to infinity
        let err = decode_scan(
            r#"{"header": {"frame_id": "l"}, "angle_min": 1e39, "angle_increment": 0.1, "ranges": []}"#,
        ).unwrap_err();
        
        assert!(matches!(err, WireError::NonFiniteAngle { field: "angle_min", .. }));
    }
    
    #[test]
    fn test_scan_survives_encoding() {
        let mut scan = RangeScan::new("laser_link", Time::new(1, 2), -0.5, 0.25, vec![1.0, f32::INFINITY, 0.0]);
        scan.intensities = vec![10.0, 0.0, 3.0];
        
        let line = encode_scan(&scan).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(decode_scan(&line).unwrap(), scan);
    }
    
    #[test]
    fn test_marker_wire_shape() {
        let marker = MarkerBuilder::new().build(vec![Point3::new(1.0, 0.0, 0.0)], "laser_link", Time::new(4, 0));
        let value: serde_json::Value = serde_json::from_str(&encode_marker(&marker).unwrap()).unwrap();
        
        assert_eq!(value["header"]["frame_id"], "laser_link");
        assert_eq!(value["type"], 8);
        assert_eq!(value["scale"]["x"], 0.02);
        assert_eq!(value["color"]["a"], 1.0);
        
        let back = decode_marker(&encode_marker(&marker).unwrap()).unwrap();
        assert_eq!(back.style, LASER_POINTS_STYLE);
    }
}
