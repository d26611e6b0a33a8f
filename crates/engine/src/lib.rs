#![deny(unsafe_code)]
//! Attractor engine: the interactive session, background bulk iteration and
//! CPU-side snapshot rendering.
//!
//! This crate sits between `attractors-core` (the attractor model) plus
//! `attractors-catalog` (the built-in definitions) and front ends such as the
//! CLI. A [`Session`] is driven by calling [`Session::tick`] once per frame
//! and draining [`SessionEvent`]s afterwards.

pub mod bulk;
pub mod notify;
pub mod pixel;
pub mod session;

#[cfg(feature = "png")]
pub mod snapshot;

pub use bulk::{BulkOutcome, BulkRequest, BulkTask, CancelToken};
pub use notify::{Notification, NotificationCenter, NotificationId, SessionEvent, Severity};
pub use session::Session;
