#![deny(unsafe_code)]
//! Core types for the attractors engine.
//!
//! Provides the [`Attractor`] model with its [`ConstantStore`] and kind-tagged
//! [`Stepper`], the bounded [`TrajectoryBuffer`], the `Xorshift64` PRNG used
//! for factory values, and the persisted [`Settings`].

pub mod attractor;
pub mod buffer;
pub mod color;
pub mod constants;
pub mod error;
pub mod prng;
pub mod settings;
pub mod stepper;

pub use attractor::{Attractor, AttractorOptions, CatalogEntry};
pub use buffer::TrajectoryBuffer;
pub use color::Color;
pub use constants::{Constant, ConstantStore, FactoryValue, SimpleConstants};
pub use error::AttractorError;
pub use glam::DVec3;
pub use prng::Xorshift64;
pub use settings::{FileStorage, MemoryStorage, Settings, SettingsStorage};
pub use stepper::{AttractorKind, CurveStepper, MapPoint, PointStepper, Stepper};
