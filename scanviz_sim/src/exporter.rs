//! JSON exporter for published markers.
//!
//! Writes the markers of a run, in wire shape, together with a summary.

use scanviz_env::VisualizationMarker;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Summary of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Node name
    pub node: String,
    
    /// Seed of the synthetic sensor, if one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    
    /// Virtual duration in seconds
    pub duration_sec: f64,
    
    pub handled: u64,
    pub failed: u64,
    
    /// Scans lost before reaching the node
    pub dropped: u64,
}

/// Complete marker export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerExport {
    pub summary: RunSummary,
    
    /// Published markers, in publish order
    pub markers: Vec<VisualizationMarker>,
}

impl MarkerExport {
    /// Creates a new export container.
    pub fn new(summary: RunSummary) -> Self {
        Self {
            summary,
            markers: Vec::new(),
        }
    }
    
    /// Adds a marker.
    pub fn add_marker(&mut self, marker: VisualizationMarker) {
        self.markers.push(marker);
    }
    
    /// Total number of points over all markers.
    pub fn point_count(&self) -> usize {
        self.markers.iter().map(|m| m.points.len()).sum()
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanviz_core::MarkerBuilder;
    use scanviz_env::{Point3, Time};
    
    #[test]
    fn test_export_round_trips_through_file() {
        let mut export = MarkerExport::new(RunSummary {
            node: "laser_scan_bf".to_string(),
            seed: Some(42),
            duration_sec: 0.1,
            handled: 1,
            failed: 0,
            dropped: 0,
        });
        export.add_marker(MarkerBuilder::new().build(
            vec![Point3::new(1.0, 0.0, 0.0), Point3::ORIGIN],
            "laser_link",
            Time::new(1, 0),
        ));
        assert_eq!(export.point_count(), 2);
        
        let path = std::env::temp_dir().join(format!("scanviz_export_{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        export.write_to_file(&path).unwrap();
        
        let back: MarkerExport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        
        assert_eq!(back.summary.seed, Some(42));
        assert_eq!(back.markers, export.markers);
    }
}
