//! Rerun sink for published markers.
//!
//! Each marker is logged as a `Points3D` entity at
//! `world/<frame_id>/<ns>/<id>`, colored with the marker color and sized
//! from `scale.x`. Rerun has no per-entity expiry, so `lifetime` is not
//! forwarded; the next scan overwrites the entity instead.
//!
//! Enable with the `visualization` feature flag.

use scanviz_env::{MarkerStyle, VisualizationMarker};

/// Entity path a marker is logged under.
pub fn marker_entity_path(marker: &VisualizationMarker) -> String {
    let frame = marker.header.frame_id.trim_matches('/');
    let frame = if frame.is_empty() { "sensor" } else { frame };
    let ns = if marker.style.ns.is_empty() { "markers" } else { marker.style.ns.as_str() };
    format!("world/{}/{}/{}", frame, ns, marker.style.id)
}

/// Point radius in scene units: half the square's edge length.
pub fn point_radius(style: &MarkerStyle) -> f32 {
    (style.scale.x / 2.0) as f32
}

#[cfg(feature = "visualization")]
pub use rerun_sink::RerunSink;

#[cfg(feature = "visualization")]
mod rerun_sink {
    use super::{marker_entity_path, point_radius};
    use rerun::{Color, Points3D, Radius, RecordingStream, RecordingStreamBuilder};
    use scanviz_env::{EnvError, MarkerAction, MarkerSink, VisualizationMarker};
    
    /// Marker sink that streams into a Rerun recording.
    pub struct RerunSink {
        rec: RecordingStream,
    }
    
    impl RerunSink {
        /// Create a sink that spawns the Rerun viewer
        pub fn new(app_id: &str) -> Result<Self, Box<dyn std::error::Error>> {
            let rec = RecordingStreamBuilder::new(app_id).spawn()?;
            
            rec.log_static(
                "world",
                &rerun::ViewCoordinates::RIGHT_HAND_Z_UP(),
            )?;
            
            Ok(Self { rec })
        }
        
        /// Create a sink that saves to a `.rrd` file
        pub fn new_to_file(app_id: &str, path: &str) -> Result<Self, Box<dyn std::error::Error>> {
            let rec = RecordingStreamBuilder::new(app_id).save(path)?;
            
            rec.log_static(
                "world",
                &rerun::ViewCoordinates::RIGHT_HAND_Z_UP(),
            )?;
            
            Ok(Self { rec })
        }
    }
    
    impl MarkerSink for RerunSink {
        fn publish(&self, marker: VisualizationMarker) -> Result<(), EnvError> {
            let path = marker_entity_path(&marker);
            self.rec.set_timestamp_secs_since_epoch("stamp", marker.header.stamp.as_secs_f64());
            
            let result = match marker.style.action {
                MarkerAction::Add => {
                    let [r, g, b, a] = marker.style.color.to_rgba8();
                    let positions = marker
                        .points
                        .iter()
                        .map(|p| [p.x as f32, p.y as f32, p.z as f32]);
                    
                    self.rec.log(
                        path.as_str(),
                        &Points3D::new(positions)
                            .with_colors([Color::from_unmultiplied_rgba(r, g, b, a)])
                            .with_radii([Radius::new_scene_units(point_radius(&marker.style))]),
                    )
                }
                MarkerAction::Delete => self.rec.log(path.as_str(), &rerun::Clear::flat()),
                MarkerAction::DeleteAll => self.rec.log("world", &rerun::Clear::recursive()),
            };
            
            result.map_err(|e| EnvError::publish(e.to_string()))
        }
    }
}
