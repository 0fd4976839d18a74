//! Polar → Cartesian conversion of a range scan.
//!
//! Each sample `i` lies on the ray `theta = angle_min + i * angle_increment`
//! in the sensor's XY plane. The output is index aligned with `ranges`:
//! `points[i]` always describes `ranges[i]`.
//!
//! Samples without a usable distance (`±inf`, `NaN`) are emitted as the
//! sensor origin instead of being dropped. A consumer therefore cannot tell
//! "no return" from "return at distance zero" by position alone, but can
//! still map every point back to its beam index.

use scanviz_env::{Point3, RangeScan};

/// Stateless converter from scan samples to sensor-frame points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanTransformer;

impl ScanTransformer {
    pub fn new() -> Self {
        Self
    }
    
    /// Converts every sample of `scan` into a point.
    ///
    /// The returned vector has exactly `scan.ranges.len()` elements.
    /// Angle parameters are not validated.
    pub fn transform(&self, scan: &RangeScan) -> Vec<Point3> {
        let angle_min = scan.angle_min as f64;
        let angle_increment = scan.angle_increment as f64;
        
        scan.ranges
            .iter()
            .enumerate()
            .map(|(i, &range)| {
                let theta = angle_min + i as f64 * angle_increment;
                polar_point(range, theta)
            })
            .collect()
    }
}

/// Projects a single range sample at angle `theta` (rad) into the XY plane.
///
/// Non-finite ranges map to [`Point3::ORIGIN`].
pub fn polar_point(range: f32, theta: f64) -> Point3 {
    if !range.is_finite() {
        return Point3::ORIGIN;
    }
    
    let range = range as f64;
    Point3::new(range * theta.cos(), range * theta.sin(), 0.0)
}
