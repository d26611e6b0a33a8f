//! Continuous-time attractors, integrated one Euler step per tick.
//!
//! Kernel references: http://www.3d-meier.de/tut5/ (Lorenz: Seite2,
//! Rössler: Seite6, Chua: Seite7).

use attractors_core::{
    Attractor, AttractorOptions, Constant, ConstantStore, CurveStepper, DVec3, Stepper,
};

pub const GROUP: &str = "Curves";

pub fn lorenz() -> Attractor {
    Attractor {
        id: "lorenz".into(),
        name: "Lorenz Attractor".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(vec![
            Constant::fixed("alpha", r"$\alpha$", 10.0),
            Constant::fixed("beta", r"$\beta$", 28.0),
            Constant::fixed("sigma", r"$\sigma$", 8.0 / 3.0),
        ]),
        stepper: Stepper::Curve(CurveStepper {
            dx: |v, c, m| (c.get("alpha") * (v.y - v.x)) * m,
            dy: |v, c, m| (v.x * (c.get("beta") - v.z) - v.y) * m,
            dz: |v, c, m| ((v.x * v.y) - (c.get("sigma") * v.z)) * m,
        }),
        options: AttractorOptions {
            scale: Some(1.0),
            multiplier: Some(0.008),
            ..Default::default()
        },
    }
}

pub fn rossler() -> Attractor {
    Attractor {
        id: "rossler".into(),
        name: "Rössler Attractor".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(vec![
            Constant::fixed("alpha", r"$\alpha$", 0.2),
            Constant::fixed("beta", r"$\beta$", 0.2),
            Constant::fixed("sigma", r"$\sigma$", 5.7),
        ]),
        stepper: Stepper::Curve(CurveStepper {
            dx: |v, _, m| (-(v.y + v.z)) * m,
            dy: |v, c, m| (v.x + c.get("alpha") * v.y) * m,
            dz: |v, c, m| (c.get("beta") + v.z * (v.x - c.get("sigma"))) * m,
        }),
        options: AttractorOptions {
            multiplier: Some(0.02),
            rotation: Some(DVec3::new(-215.0, 0.0, 0.0)),
            ..Default::default()
        },
    }
}

/// Chua's circuit with the piecewise-linear diode `j·x + (i + j)(|x + 1| − |x − 1|)`.
pub fn chua() -> Attractor {
    Attractor {
        id: "chua".into(),
        name: "Chua's Circuit".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(vec![
            Constant::fixed("alpha", r"$\alpha$", 15.6),
            Constant::fixed("beta", r"$\beta$", 1.0),
            Constant::fixed("sigma", r"$\sigma$", 25.58),
            Constant::fixed("i", "$i$", -1.0),
            Constant::fixed("j", "$j$", 0.0),
        ]),
        stepper: Stepper::Curve(CurveStepper {
            dx: |v, c, m| {
                let (i, j) = (c.get("i"), c.get("j"));
                let diode = j * v.x + (i + j) * ((v.x + 1.0).abs() - (v.x - 1.0).abs());
                (c.get("alpha") * (v.y - v.x - diode)) * m
            },
            dy: |v, c, m| (c.get("beta") * (v.x - v.y + v.z)) * m,
            dz: |v, c, m| (-c.get("sigma") * v.y) * m,
        }),
        options: AttractorOptions {
            multiplier: Some(0.01),
            ..Default::default()
        },
    }
}

/// Thomas' cyclically symmetric attractor.
pub fn thomas() -> Attractor {
    Attractor {
        id: "thomas".into(),
        name: "Thomas Attractor".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(vec![Constant::fixed("b", "$b$", 0.101)]),
        stepper: Stepper::Curve(CurveStepper {
            dx: |v, c, m| ((v.y / 2.0).sin() - c.get("b") * v.x) * m,
            dy: |v, c, m| ((v.z / 2.0).sin() - c.get("b") * v.y) * m,
            dz: |v, c, m| ((v.x / 2.0).sin() - c.get("b") * v.z) * m,
        }),
        options: AttractorOptions {
            multiplier: Some(0.3),
            ..Default::default()
        },
    }
}
