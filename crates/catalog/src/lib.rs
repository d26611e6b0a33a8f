#![deny(unsafe_code)]
//! Attractor catalog: the read-only registry of built-in attractor definitions.
//!
//! Entries are created once and never mutated. Lookups hand out shared
//! references; sessions clone the entry they select so constant edits stay
//! local to the session.

pub mod curves;
pub mod points;

use attractors_core::{Attractor, AttractorError, CatalogEntry, Xorshift64};

/// Seed for the factory values drawn when the catalog is built without one.
pub const DEFAULT_SEED: u64 = 0x00A7_7AC7_0125;

/// Ordered registry of attractors, keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    attractors: Vec<Attractor>,
}

impl Catalog {
    /// Built-in attractors with factory values drawn from [`DEFAULT_SEED`].
    pub fn builtin() -> Self {
        Self::seeded(DEFAULT_SEED)
    }

    /// Built-in attractors with factory values drawn from `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let mut attractors = vec![
            curves::lorenz(),
            curves::rossler(),
            curves::chua(),
            curves::thomas(),
            points::gingerbread_man(),
            points::henon(),
        ];
        for a in &mut attractors {
            a.reset_constants(&mut rng);
        }
        Self::from_attractors(attractors)
    }

    /// Wraps an arbitrary set of definitions. Later duplicates of an id are dropped.
    pub fn from_attractors(attractors: Vec<Attractor>) -> Self {
        let mut unique: Vec<Attractor> = Vec::with_capacity(attractors.len());
        for a in attractors {
            if unique.iter().any(|u| u.id == a.id) {
                log::warn!("dropping duplicate attractor id '{}'", a.id);
                continue;
            }
            unique.push(a);
        }
        Self { attractors: unique }
    }

    pub fn get(&self, id: &str) -> Result<&Attractor, AttractorError> {
        self.attractors
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AttractorError::UnknownAttractor(id.to_string()))
    }

    pub fn get_index(&self, index: usize) -> Result<&Attractor, AttractorError> {
        self.attractors
            .get(index)
            .ok_or(AttractorError::IndexOutOfRange {
                index,
                len: self.attractors.len(),
            })
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.attractors.iter().position(|a| a.id == id)
    }

    /// Identity, name and group of every entry, in registry order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.attractors.iter().map(Attractor::entry).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attractor> {
        self.attractors.iter()
    }

    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
