//! Discrete-time maps, iterated in bulk into a static point cloud.
//!
//! Both maps seed from the constants `x0` and `y0`, which are re-drawn from
//! `[1, 3)` on every reset.

use attractors_core::{Attractor, AttractorOptions, Constant, ConstantStore, PointStepper, Stepper};

pub const GROUP: &str = "Points";

fn seed_constants() -> Vec<Constant> {
    vec![
        Constant::uniform("x0", "$x_0$", 1.0, 3.0),
        Constant::uniform("y0", "$y_0$", 1.0, 3.0),
    ]
}

/// Gingerbread Man: `x' = 1 − y + |x|`, `y' = x`.
///
/// The multiplier scales every `y` term, but the first `x` term is taken
/// from the seed unscaled.
pub fn gingerbread_man() -> Attractor {
    Attractor {
        id: "gingerbread".into(),
        name: "Gingerbread Man".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(seed_constants()),
        stepper: Stepper::Point(PointStepper {
            x: |i, c, m, h| {
                let (x, y) = PointStepper::previous(i, c, h);
                let next = 1.0 - y + x.abs();
                if i == 0 {
                    next
                } else {
                    next * m
                }
            },
            y: |i, c, m, h| PointStepper::previous(i, c, h).0 * m,
        }),
        options: AttractorOptions {
            scale: Some(5.0),
            multiplier: Some(1.0),
            ..Default::default()
        },
    }
}

/// Hénon map: `x' = 1 + y − αx²`, `y' = βx`.
pub fn henon() -> Attractor {
    let mut constants = vec![
        Constant::fixed("alpha", r"$\alpha$", 1.4),
        Constant::fixed("beta", r"$\beta$", 0.3),
    ];
    constants.extend(seed_constants());
    Attractor {
        id: "henon".into(),
        name: "Hénon Map".into(),
        group: GROUP.into(),
        constants: ConstantStore::new(constants),
        stepper: Stepper::Point(PointStepper {
            x: |i, c, m, h| {
                let (x, y) = PointStepper::previous(i, c, h);
                (1.0 + y - c.get("alpha") * x * x) * m
            },
            y: |i, c, m, h| c.get("beta") * PointStepper::previous(i, c, h).0 * m,
        }),
        options: AttractorOptions {
            scale: Some(40.0),
            multiplier: Some(0.5),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attractors_core::{MapPoint, SimpleConstants};

    fn run(attractor: &Attractor, constants: &SimpleConstants, m: f64, n: usize) -> Vec<MapPoint> {
        let Stepper::Point(stepper) = attractor.stepper else {
            panic!("{} is not a point map", attractor.id);
        };
        let mut history = Vec::with_capacity(n);
        for i in 0..n {
            let next = stepper.step(i, constants, m, &history).unwrap();
            history.push(next);
        }
        history
    }

    #[test]
    fn gingerbread_from_known_seed() {
        let seed: SimpleConstants = [("x0", 2.0), ("y0", 1.0)].into_iter().collect();
        let history = run(&gingerbread_man(), &seed, 1.0, 2);
        assert_eq!(history, vec![(2.0, 2.0), (1.0, 2.0)]);
    }

    #[test]
    fn gingerbread_seed_x_ignores_multiplier() {
        let seed: SimpleConstants = [("x0", 2.0), ("y0", 1.0)].into_iter().collect();
        let history = run(&gingerbread_man(), &seed, 0.5, 2);
        assert_eq!(history[0], (2.0, 1.0));
        // Later terms are scaled on both axes: x = (1 - 1 + 2) * 0.5, y = 2 * 0.5.
        assert_eq!(history[1], (1.0, 1.0));
    }

    #[test]
    fn henon_from_known_seed() {
        let mut c = henon().simple_constants();
        c.insert("x0", 1.0);
        c.insert("y0", 0.0);
        let history = run(&henon(), &c, 1.0, 2);
        let (x1, y1) = (1.0 + 0.0 - 1.4, 0.3);
        assert!((history[0].0 - x1).abs() < 1e-12);
        assert!((history[0].1 - y1).abs() < 1e-12);
        let x2 = 1.0 + y1 - 1.4 * x1 * x1;
        assert!((history[1].0 - x2).abs() < 1e-12);
        assert!((history[1].1 - 0.3 * x1).abs() < 1e-12);
    }

    #[test]
    fn henon_multiplier_scales_both_coordinates() {
        let mut c = henon().simple_constants();
        c.insert("x0", 0.5);
        c.insert("y0", 0.5);
        let full = run(&henon(), &c, 1.0, 1)[0];
        let half = run(&henon(), &c, 0.5, 1)[0];
        assert!((half.0 - full.0 * 0.5).abs() < 1e-12);
        assert!((half.1 - full.1 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn seeds_are_uniform_factories() {
        for a in [gingerbread_man(), henon()] {
            for id in ["x0", "y0"] {
                let c = a.constants.get(id).unwrap();
                assert!(matches!(
                    c.factory,
                    attractors_core::FactoryValue::Uniform { min, max } if min == 1.0 && max == 3.0
                ));
            }
        }
    }
}
