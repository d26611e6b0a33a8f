//! Bounded trajectory buffer.
//!
//! Curve sessions append one position per tick and evict from the front once
//! the bound is exceeded, giving a sliding window of the most recent points.
//! Point sessions swap in a freshly computed trajectory in one go.

use crate::error::AttractorError;
use glam::DVec3;
use std::collections::VecDeque;

/// Ordered positions, oldest first, never longer than `max_points`.
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer {
    points: VecDeque<DVec3>,
    max_points: usize,
}

impl TrajectoryBuffer {
    /// Creates an empty buffer. Fails when `max_points` is zero.
    pub fn new(max_points: usize) -> Result<Self, AttractorError> {
        if max_points == 0 {
            return Err(AttractorError::InvalidMaxPoints);
        }
        Ok(Self {
            points: VecDeque::with_capacity(max_points.min(4096)),
            max_points,
        })
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Changes the bound and trims the oldest points immediately if needed.
    pub fn set_max_points(&mut self, max_points: usize) -> Result<(), AttractorError> {
        if max_points == 0 {
            return Err(AttractorError::InvalidMaxPoints);
        }
        self.max_points = max_points;
        self.trim();
        Ok(())
    }

    /// Appends at the end, evicting from the front past the bound.
    pub fn append(&mut self, position: DVec3) {
        self.points.push_back(position);
        self.trim();
    }

    /// Atomically replaces the contents with the first `max_points` of `sequence`.
    pub fn replace(&mut self, sequence: Vec<DVec3>) {
        let mut points = VecDeque::from(sequence);
        points.truncate(self.max_points);
        self.points = points;
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<DVec3> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DVec3> + '_ {
        self.points.iter()
    }

    /// Owned copy of the contents in insertion order.
    pub fn snapshot(&self) -> Vec<DVec3> {
        self.points.iter().copied().collect()
    }

    /// True if any coordinate of any position is NaN or infinite.
    pub fn detect_divergence(&self) -> bool {
        self.points.iter().any(|p| !p.is_finite())
    }

    fn trim(&mut self) {
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }
}
