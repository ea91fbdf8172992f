//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Battle tick counter (one tick per rendered frame)
pub type Tick = u64;

/// Simulation clock in milliseconds
pub type SimTime = u64;

/// 2D battlefield position
///
/// `x` is the advance axis, `y` the lateral (flank) axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
