//! The attractor definition: identity, constants, stepper and display options.
//!
//! Catalog entries are immutable. A session works on a clone, so edits to
//! constants never leak back into the registry.

use crate::constants::{ConstantStore, SimpleConstants};
use crate::error::AttractorError;
use crate::prng::Xorshift64;
use crate::stepper::{AttractorKind, MapPoint, Stepper};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Starting coordinate for curve integration when an attractor sets none.
pub const DEFAULT_ORIGIN: DVec3 = DVec3::new(0.01, 0.0, 0.0);

/// Step multiplier used when an attractor sets none.
pub const DEFAULT_MULTIPLIER: f64 = 0.008;

/// Optional per-attractor presentation and stepping defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttractorOptions {
    pub scale: Option<f64>,
    /// Euler angles (x, y, z) in radians, applied in XYZ order by renderers.
    pub rotation: Option<DVec3>,
    /// Default step multiplier.
    pub multiplier: Option<f64>,
    /// Seed coordinate for curve integration.
    pub origin: Option<DVec3>,
}

/// A dynamical system definition.
#[derive(Debug, Clone)]
pub struct Attractor {
    pub id: String,
    pub name: String,
    pub group: String,
    pub constants: ConstantStore,
    pub stepper: Stepper,
    pub options: AttractorOptions,
}

impl Attractor {
    pub fn kind(&self) -> AttractorKind {
        self.stepper.kind()
    }

    pub fn origin(&self) -> DVec3 {
        self.options.origin.unwrap_or(DEFAULT_ORIGIN)
    }

    pub fn default_multiplier(&self) -> f64 {
        self.options.multiplier.unwrap_or(DEFAULT_MULTIPLIER)
    }

    /// Current constant values, snapshotted for one stepper invocation.
    pub fn simple_constants(&self) -> SimpleConstants {
        self.constants.simplify()
    }

    /// Overwrites one constant.
    pub fn set_constant(&mut self, id: &str, value: f64) -> Result<(), AttractorError> {
        if self.constants.set(id, value) {
            Ok(())
        } else {
            Err(AttractorError::UnknownConstant {
                attractor: self.id.clone(),
                constant: id.to_string(),
            })
        }
    }

    /// Re-evaluates every factory value.
    pub fn reset_constants(&mut self, rng: &mut Xorshift64) {
        self.constants.reset(rng);
    }

    /// One Euler increment from `position`. Fails for point attractors.
    pub fn curve_delta(&self, position: DVec3, multiplier: f64) -> Result<DVec3, AttractorError> {
        match &self.stepper {
            Stepper::Curve(curve) => Ok(curve.step(position, &self.simple_constants(), multiplier)),
            Stepper::Point(_) => Err(AttractorError::NotACurveAttractor(self.id.clone())),
        }
    }

    /// Lightweight listing entry for selection UIs.
    pub fn entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            group: self.group.clone(),
            kind: self.kind(),
        }
    }
}

/// Identity and grouping of an attractor, without its kernels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub group: String,
    pub kind: AttractorKind,
}

/// Embeds a point-map term as a position on the z = 0 plane.
pub fn embed(point: MapPoint) -> DVec3 {
    DVec3::new(point.0, point.1, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Constant;
    use crate::stepper::{CurveStepper, PointStepper};

    fn decay() -> Attractor {
        Attractor {
            id: "decay".into(),
            name: "Decay".into(),
            group: "Curves".into(),
            constants: ConstantStore::new(vec![Constant::fixed("k", "$k$", 0.5)]),
            stepper: Stepper::Curve(CurveStepper {
                dx: |p, c, m| -c.get("k") * p.x * m,
                dy: |p, c, m| -c.get("k") * p.y * m,
                dz: |p, c, m| -c.get("k") * p.z * m,
            }),
            options: AttractorOptions {
                multiplier: Some(0.1),
                ..Default::default()
            },
        }
    }

    fn cloud() -> Attractor {
        Attractor {
            id: "cloud".into(),
            name: "Cloud".into(),
            group: "Points".into(),
            constants: ConstantStore::new(vec![
                Constant::uniform("x0", "$x_0$", 1.0, 3.0),
                Constant::uniform("y0", "$y_0$", 1.0, 3.0),
            ]),
            stepper: Stepper::Point(PointStepper {
                x: |i, c, _, h| PointStepper::previous(i, c, h).1,
                y: |i, c, _, h| PointStepper::previous(i, c, h).0,
            }),
            options: AttractorOptions::default(),
        }
    }

    #[test]
    fn defaults_apply_when_options_absent() {
        let a = cloud();
        assert_eq!(a.origin(), DEFAULT_ORIGIN);
        assert_eq!(a.default_multiplier(), DEFAULT_MULTIPLIER);
    }

    #[test]
    fn options_override_defaults() {
        assert_eq!(decay().default_multiplier(), 0.1);
    }

    #[test]
    fn curve_delta_uses_live_constants() {
        let mut a = decay();
        let d = a.curve_delta(DVec3::new(2.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(d.x, -1.0);
        a.set_constant("k", 1.0).unwrap();
        let d = a.curve_delta(DVec3::new(2.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(d.x, -2.0);
    }

    #[test]
    fn curve_delta_rejects_point_attractor() {
        let err = cloud().curve_delta(DVec3::ZERO, 1.0).unwrap_err();
        assert_eq!(err, AttractorError::NotACurveAttractor("cloud".into()));
    }

    #[test]
    fn set_constant_unknown_id_fails() {
        let err = decay().set_constant("q", 1.0).unwrap_err();
        assert!(matches!(err, AttractorError::UnknownConstant { .. }));
    }

    #[test]
    fn clone_isolates_constant_edits() {
        let original = decay();
        let mut copy = original.clone();
        copy.set_constant("k", 9.0).unwrap();
        assert_eq!(original.simple_constants().get("k"), 0.5);
        assert_eq!(copy.simple_constants().get("k"), 9.0);
    }

    #[test]
    fn reset_constants_redraws_from_factories() {
        let mut a = cloud();
        a.reset_constants(&mut Xorshift64::new(3));
        let x0 = a.simple_constants().get("x0");
        assert!((1.0..3.0).contains(&x0));
    }

    #[test]
    fn entry_carries_identity_and_kind() {
        let e = cloud().entry();
        assert_eq!(e.id, "cloud");
        assert_eq!(e.group, "Points");
        assert_eq!(e.kind, AttractorKind::Point);
    }

    #[test]
    fn embed_places_point_on_z_plane() {
        assert_eq!(embed((1.5, -2.0)), DVec3::new(1.5, -2.0, 0.0));
    }
}
