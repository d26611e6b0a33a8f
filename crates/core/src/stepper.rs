//! Stepping contracts for the two attractor kinds.
//!
//! Curve attractors are integrated with explicit Euler: each tick the caller
//! asks [`CurveStepper::step`] for a delta and adds it to the running
//! position, the multiplier acting as the fixed step size. Point attractors
//! are discrete recurrences: [`PointStepper::step`] computes the i-th term
//! from the seed constants (i = 0) or the previous history entry.
//!
//! Kernels are plain `fn` pointers. They are pure, read no global state and
//! have no internal randomness, so identical inputs give bit-identical output.

use crate::constants::SimpleConstants;
use crate::error::AttractorError;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A term of a 2D point map.
pub type MapPoint = (f64, f64);

/// One axis of a curve kernel: `(position, constants, multiplier) -> increment`.
pub type CurveFn = fn(DVec3, &SimpleConstants, f64) -> f64;

/// One coordinate of a point kernel: `(index, constants, multiplier, history) -> value`.
///
/// `history` holds exactly `index` entries; the kernel reads `history[index - 1]`
/// for `index > 0`.
pub type PointFn = fn(usize, &SimpleConstants, f64, &[MapPoint]) -> f64;

/// Discriminant of the two stepper contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttractorKind {
    Curve,
    Point,
}

impl AttractorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttractorKind::Curve => "curve",
            AttractorKind::Point => "point",
        }
    }
}

/// Per-axis derivative kernels of a continuous-time system.
#[derive(Clone, Copy)]
pub struct CurveStepper {
    pub dx: CurveFn,
    pub dy: CurveFn,
    pub dz: CurveFn,
}

impl CurveStepper {
    /// Increment `(dX, dY, dZ)` for one Euler step from `position`.
    pub fn step(&self, position: DVec3, constants: &SimpleConstants, multiplier: f64) -> DVec3 {
        DVec3::new(
            (self.dx)(position, constants, multiplier),
            (self.dy)(position, constants, multiplier),
            (self.dz)(position, constants, multiplier),
        )
    }
}

/// Coordinate kernels of a discrete-time 2D map.
#[derive(Clone, Copy)]
pub struct PointStepper {
    pub x: PointFn,
    pub y: PointFn,
}

impl PointStepper {
    /// Computes term `index` of the recurrence.
    ///
    /// Fails with [`AttractorError::OutOfOrder`] unless `history` holds exactly the
    /// `index` previously computed terms.
    pub fn step(
        &self,
        index: usize,
        constants: &SimpleConstants,
        multiplier: f64,
        history: &[MapPoint],
    ) -> Result<MapPoint, AttractorError> {
        if history.len() != index {
            return Err(AttractorError::OutOfOrder {
                index,
                history_len: history.len(),
            });
        }
        Ok((
            (self.x)(index, constants, multiplier, history),
            (self.y)(index, constants, multiplier, history),
        ))
    }

    /// Previous term, or the `(x0, y0)` seed constants at index 0.
    pub fn previous(index: usize, constants: &SimpleConstants, history: &[MapPoint]) -> MapPoint {
        match index.checked_sub(1).and_then(|i| history.get(i)) {
            Some(&prev) => prev,
            None => (constants.get("x0"), constants.get("y0")),
        }
    }
}

/// Kind-specific kernels carried by an attractor definition.
#[derive(Clone, Copy)]
pub enum Stepper {
    Curve(CurveStepper),
    Point(PointStepper),
}

impl Stepper {
    pub fn kind(&self) -> AttractorKind {
        match self {
            Stepper::Curve(_) => AttractorKind::Curve,
            Stepper::Point(_) => AttractorKind::Point,
        }
    }
}

impl std::fmt::Debug for Stepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stepper::{:?}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> SimpleConstants {
        [("a", 2.0), ("x0", 0.5), ("y0", -0.5)].into_iter().collect()
    }

    fn linear() -> CurveStepper {
        CurveStepper {
            dx: |p, c, m| c.get("a") * p.x * m,
            dy: |p, _, m| -p.y * m,
            dz: |_, _, m| m,
        }
    }

    fn shift() -> PointStepper {
        PointStepper {
            x: |i, c, m, h| PointStepper::previous(i, c, h).0 * m + 1.0,
            y: |i, c, _, h| PointStepper::previous(i, c, h).1,
        }
    }

    #[test]
    fn curve_step_evaluates_each_axis() {
        let delta = linear().step(DVec3::new(1.0, 2.0, 3.0), &constants(), 0.5);
        assert_eq!(delta, DVec3::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn curve_step_does_not_touch_inputs() {
        let p = DVec3::new(1.0, 1.0, 1.0);
        let c = constants();
        let _ = linear().step(p, &c, 0.1);
        assert_eq!(p, DVec3::ONE);
        assert_eq!(c, constants());
    }

    #[test]
    fn point_step_uses_seed_at_index_zero() {
        let (x, y) = shift().step(0, &constants(), 2.0, &[]).unwrap();
        assert_eq!((x, y), (2.0, -0.5));
    }

    #[test]
    fn point_step_uses_previous_history_entry() {
        let history = [(0.0, 0.0), (3.0, 4.0)];
        let (x, y) = shift().step(2, &constants(), 1.0, &history).unwrap();
        assert_eq!((x, y), (4.0, 4.0));
    }

    #[test]
    fn point_step_rejects_out_of_order_index() {
        let err = shift().step(3, &constants(), 1.0, &[(1.0, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            AttractorError::OutOfOrder {
                index: 3,
                history_len: 1
            }
        );
    }

    #[test]
    fn stepper_kind_matches_variant() {
        assert_eq!(Stepper::Curve(linear()).kind(), AttractorKind::Curve);
        assert_eq!(Stepper::Point(shift()).kind(), AttractorKind::Point);
        assert_eq!(format!("{:?}", Stepper::Point(shift())), "Stepper::Point");
    }
}
