//! Tunable attractor constants and the flat snapshot handed to steppers.
//!
//! A [`ConstantStore`] keeps the ordered, user-editable constants of one
//! attractor together with their factory generators. Steppers never see it:
//! before every invocation the store is collapsed into [`SimpleConstants`],
//! a plain `id -> value` map, so the numeric kernels stay independent of
//! display names and reset metadata.

use crate::error::AttractorError;
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generator for a constant's default value, evaluated afresh on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryValue {
    /// Always the same value.
    Fixed(f64),
    /// A fresh draw from `[min, max)` each time.
    Uniform { min: f64, max: f64 },
}

impl FactoryValue {
    /// Produces a new default value.
    pub fn generate(&self, rng: &mut Xorshift64) -> f64 {
        match *self {
            FactoryValue::Fixed(v) => v,
            FactoryValue::Uniform { min, max } => rng.next_range(min, max),
        }
    }

    /// Deterministic representative value, used before the first reset.
    pub fn nominal(&self) -> f64 {
        match *self {
            FactoryValue::Fixed(v) => v,
            FactoryValue::Uniform { min, max } => (min + max) / 2.0,
        }
    }
}

/// One named numeric parameter of an attractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub id: String,
    /// Display label; may contain TeX markup such as `$\alpha$`.
    pub name: String,
    pub value: f64,
    pub factory: FactoryValue,
}

impl Constant {
    /// Creates a constant whose current value is the factory's nominal value.
    pub fn new(id: &str, name: &str, factory: FactoryValue) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            value: factory.nominal(),
            factory,
        }
    }

    /// Shorthand for a constant with a [`FactoryValue::Fixed`] default.
    pub fn fixed(id: &str, name: &str, value: f64) -> Self {
        Self::new(id, name, FactoryValue::Fixed(value))
    }

    /// Shorthand for a constant re-drawn from `[min, max)` on reset.
    pub fn uniform(id: &str, name: &str, min: f64, max: f64) -> Self {
        Self::new(id, name, FactoryValue::Uniform { min, max })
    }

    /// Overwrites `value` with a fresh factory value.
    pub fn reset(&mut self, rng: &mut Xorshift64) {
        self.value = self.factory.generate(rng);
    }
}

/// Flat `id -> value` view of a constant set, recomputed per stepper call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleConstants(BTreeMap<String, f64>);

impl SimpleConstants {
    /// Value of constant `id`, or NaN when absent so the divergence check catches it.
    pub fn get(&self, id: &str) -> f64 {
        self.0.get(id).copied().unwrap_or(f64::NAN)
    }

    pub fn insert(&mut self, id: &str, value: f64) {
        self.0.insert(id.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for SimpleConstants {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Ordered constants of a single attractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantStore {
    constants: Vec<Constant>,
}

impl ConstantStore {
    /// Builds a store, keeping the first occurrence of any duplicated id.
    pub fn new(constants: Vec<Constant>) -> Self {
        let mut unique: Vec<Constant> = Vec::with_capacity(constants.len());
        for c in constants {
            if unique.iter().all(|u| u.id != c.id) {
                unique.push(c);
            }
        }
        Self { constants: unique }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constant> {
        self.constants.iter()
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.id == id)
    }

    /// Overwrites the value of constant `id`. Returns `false` if no such constant exists.
    pub fn set(&mut self, id: &str, value: f64) -> bool {
        match self.constants.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.value = value;
                true
            }
            None => false,
        }
    }

    /// Re-evaluates every factory and overwrites the current values.
    pub fn reset(&mut self, rng: &mut Xorshift64) {
        for c in &mut self.constants {
            c.reset(rng);
        }
    }

    /// Snapshot of current values for a stepper invocation.
    pub fn simplify(&self) -> SimpleConstants {
        self.constants
            .iter()
            .map(|c| (c.id.as_str(), c.value))
            .collect()
    }

    /// Applies `id -> value` overrides. Nothing is written if any id is unknown.
    pub fn apply(
        &mut self,
        attractor_id: &str,
        overrides: &SimpleConstants,
    ) -> Result<(), AttractorError> {
        if let Some((unknown, _)) = overrides.iter().find(|(id, _)| self.get(id).is_none()) {
            return Err(AttractorError::UnknownConstant {
                attractor: attractor_id.to_string(),
                constant: unknown.to_string(),
            });
        }
        for (id, value) in overrides.iter() {
            self.set(id, value);
        }
        Ok(())
    }
}
