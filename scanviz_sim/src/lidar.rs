//! Synthetic planar lidar.
//!
//! Casts evenly spaced beams from a fixed sensor pose inside a rectangular
//! room with circular pillars and reports the first hit per beam:
//! - Walls and pillars are intersected exactly
//! - Returns beyond `range_max` and random dropouts become `+inf`
//! - Valid returns get Gaussian range noise

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use scanviz_env::{RangeScan, Time};
use std::f64::consts::PI;

/// A circular obstacle in the room.
#[derive(Debug, Clone, Copy)]
pub struct Pillar {
    pub center: Vector2<f64>,
    pub radius: f64,
}

/// Sensor and world parameters of the synthetic lidar.
#[derive(Debug, Clone)]
pub struct LidarConfig {
    /// Frame the scans are reported in
    pub frame_id: String,
    
    /// Number of beams per scan
    pub beams: usize,
    
    /// First beam angle (rad)
    pub angle_min: f64,
    
    /// Sweep covered by all beams (rad)
    pub fov: f64,
    
    /// Closest and farthest measurable distance (m)
    pub range_min: f64,
    pub range_max: f64,
    
    /// Range noise standard deviation (m)
    pub noise_std: f64,
    
    /// Probability that a beam returns nothing
    pub dropout_rate: f64,
    
    /// Room half extents, walls at `±x` and `±y` (m)
    pub room_half_extents: Vector2<f64>,
    
    /// Sensor position in the room (m)
    pub sensor_position: Vector2<f64>,
    
    pub pillars: Vec<Pillar>,
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            frame_id: "laser_link".to_string(),
            beams: 360,
            angle_min: -PI,
            fov: 2.0 * PI,
            range_min: 0.12,
            range_max: 12.0,
            noise_std: 0.01,
            dropout_rate: 0.02,
            room_half_extents: Vector2::new(5.0, 3.5),
            sensor_position: Vector2::new(-1.0, 0.5),
            pillars: vec![
                Pillar { center: Vector2::new(2.0, 1.0), radius: 0.3 },
                Pillar { center: Vector2::new(1.0, -2.0), radius: 0.5 },
            ],
        }
    }
}

impl LidarConfig {
    /// Angular step between beams (rad).
    pub fn angle_increment(&self) -> f64 {
        if self.beams == 0 {
            0.0
        } else {
            self.fov / self.beams as f64
        }
    }
}

/// Seeded generator of synthetic scans.
pub struct SimLidar {
    config: LidarConfig,
    rng: ChaCha8Rng,
    noise: Option<Normal<f64>>,
}

impl SimLidar {
    /// Creates a lidar whose noise and dropouts derive from `seed`.
    pub fn new(config: LidarConfig, seed: u64) -> Self {
        // Normal::new only fails on negative or non-finite std
        let noise = if config.noise_std > 0.0 {
            Normal::new(0.0, config.noise_std).ok()
        } else {
            None
        };
        
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise,
        }
    }
    
    pub fn config(&self) -> &LidarConfig {
        &self.config
    }
    
    /// Distance along a unit ray to the first wall or pillar, if any.
    pub fn cast(&self, direction: Vector2<f64>) -> Option<f64> {
        let origin = self.config.sensor_position;
        let half = self.config.room_half_extents;
        
        let wall = |o: f64, d: f64, h: f64| -> f64 {
            if d > 0.0 {
                (h - o) / d
            } else if d < 0.0 {
                (-h - o) / d
            } else {
                f64::INFINITY
            }
        };
        
        let mut best = wall(origin.x, direction.x, half.x).min(wall(origin.y, direction.y, half.y));
        
        for pillar in &self.config.pillars {
            let offset = origin - pillar.center;
            let b = direction.dot(&offset);
            let c = offset.norm_squared() - pillar.radius * pillar.radius;
            let disc = b * b - c;
            if disc < 0.0 {
                continue;
            }
            let t = -b - disc.sqrt();
            if t > 0.0 && t < best {
                best = t;
            }
        }
        
        best.is_finite().then_some(best)
    }
    
    /// Produces the next scan, stamped with `stamp`.
    pub fn scan(&mut self, stamp: Time) -> RangeScan {
        let increment = self.config.angle_increment();
        let mut ranges = Vec::with_capacity(self.config.beams);
        
        for i in 0..self.config.beams {
            let theta = self.config.angle_min + i as f64 * increment;
            let direction = Vector2::new(theta.cos(), theta.sin());
            
            let dropped = self.config.dropout_rate > 0.0 && self.rng.gen_bool(self.config.dropout_rate.min(1.0));
            let range = match self.cast(direction) {
                Some(d) if !dropped && d <= self.config.range_max => {
                    let noise = self.noise.map_or(0.0, |n| n.sample(&mut self.rng));
                    (d + noise).max(self.config.range_min) as f32
                }
                _ => f32::INFINITY,
            };
            ranges.push(range);
        }
        
        let mut scan = RangeScan::new(
            self.config.frame_id.clone(),
            stamp,
            self.config.angle_min as f32,
            increment as f32,
            ranges,
        );
        scan.range_min = self.config.range_min as f32;
        scan.range_max = self.config.range_max as f32;
        scan
    }
}
