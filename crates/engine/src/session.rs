//! Session controller: the interactive side of the engine.
//!
//! A [`Session`] owns a clone of the selected attractor, the running
//! coordinate and the trajectory buffer. For curve attractors every
//! [`Session::tick`] takes one Euler step and appends the new position. For
//! point attractors the session dispatches a [`BulkTask`] and installs its
//! result when a later tick (or [`Session::wait_for_bulk`]) picks it up. At
//! most one task is in flight; dispatching a new one cancels the previous
//! and reports it as a failed (cancelled) lifecycle event. Results from
//! superseded generations are discarded.

use crate::bulk::{BulkOutcome, BulkRequest, BulkTask};
use crate::notify::{Notification, NotificationCenter, NotificationId, SessionEvent};
use attractors_catalog::Catalog;
use attractors_core::settings::{
    HIGH_MAX_POINTS, KEY_AUTO_ROTATE, KEY_AUTO_ROTATE_SPEED, KEY_COLOR, KEY_LINE_WIDTH,
    KEY_MAX_POINTS,
};
use attractors_core::{
    Attractor, AttractorError, AttractorKind, Color, DVec3, Settings, SettingsStorage,
    SimpleConstants, TrajectoryBuffer, Xorshift64,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Interactive state for one viewer.
pub struct Session {
    catalog: Arc<Catalog>,
    active: Attractor,
    index: usize,
    coordinate: DVec3,
    buffer: TrajectoryBuffer,
    multiplier: f64,
    scale: f64,
    settings: Settings,
    storage: Option<Box<dyn SettingsStorage>>,
    rng: Xorshift64,
    bulk: Option<BulkTask>,
    generation: u64,
    notifications: NotificationCenter,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Creates a session on the first catalog entry.
    ///
    /// `seed` drives factory-value randomization on constant resets.
    pub fn new(catalog: Arc<Catalog>, settings: Settings, seed: u64) -> Result<Self, AttractorError> {
        let first = catalog.get_index(0)?.clone();
        let mut session = Self {
            buffer: TrajectoryBuffer::new(settings.max_points)?,
            coordinate: first.origin(),
            multiplier: first.default_multiplier(),
            scale: first.options.scale.unwrap_or(1.0),
            active: first,
            index: 0,
            catalog,
            settings,
            storage: None,
            rng: Xorshift64::new(seed),
            bulk: None,
            generation: 0,
            notifications: NotificationCenter::new(),
            events: Vec::new(),
        };
        session.activate(0)?;
        Ok(session)
    }

    /// Creates a session whose persisted settings are loaded from and written to `storage`.
    pub fn with_storage(
        catalog: Arc<Catalog>,
        storage: Box<dyn SettingsStorage>,
        seed: u64,
    ) -> Result<Self, AttractorError> {
        let settings = Settings::load(storage.as_ref());
        let mut session = Self::new(catalog, settings, seed)?;
        session.storage = Some(storage);
        Ok(session)
    }

    // -- selection --

    /// Selects the catalog entry with `id`. Unknown ids leave the session untouched.
    pub fn select(&mut self, id: &str) -> Result<(), AttractorError> {
        let index = self
            .catalog
            .index_of(id)
            .ok_or_else(|| AttractorError::UnknownAttractor(id.to_string()))?;
        self.activate(index)
    }

    /// Selects the catalog entry at `index`.
    pub fn select_index(&mut self, index: usize) -> Result<(), AttractorError> {
        self.activate(index)
    }

    fn activate(&mut self, index: usize) -> Result<(), AttractorError> {
        let attractor = self.catalog.get_index(index)?.clone();
        log::info!("selected attractor '{}' ({})", attractor.id, attractor.kind().as_str());
        self.cancel_bulk();
        self.buffer.clear();
        self.coordinate = attractor.origin();
        if let Some(scale) = attractor.options.scale {
            self.scale = scale;
        }
        if let Some(multiplier) = attractor.options.multiplier {
            self.multiplier = multiplier;
        }
        self.active = attractor;
        self.index = index;
        self.refresh_points();
        Ok(())
    }

    // -- constants --

    /// Overwrites one constant of the active attractor.
    pub fn set_constant(&mut self, id: &str, value: f64) -> Result<(), AttractorError> {
        self.active.set_constant(id, value)?;
        self.refresh_points();
        Ok(())
    }

    /// Re-evaluates every factory value of the active attractor.
    pub fn reset_constants(&mut self) {
        self.active.reset_constants(&mut self.rng);
        self.refresh_points();
    }

    /// Overwrites several constants at once. Nothing changes if any id is unknown.
    pub fn apply_constants(&mut self, overrides: &SimpleConstants) -> Result<(), AttractorError> {
        self.active.constants.apply(&self.active.id, overrides)?;
        self.refresh_points();
        Ok(())
    }

    // -- configuration --

    /// Changes the point budget, trimming the buffer immediately.
    pub fn set_max_points(&mut self, max_points: usize) -> Result<(), AttractorError> {
        self.buffer.set_max_points(max_points)?;
        self.settings.max_points = max_points;
        if max_points > HIGH_MAX_POINTS {
            self.notify(Notification::high_max_points(max_points));
        }
        self.persist(KEY_MAX_POINTS);
        self.refresh_points();
        Ok(())
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
        self.refresh_points();
    }

    pub fn set_color(&mut self, color: Color) {
        self.settings.color = color;
        self.persist(KEY_COLOR);
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.settings.line_width = line_width;
        self.persist(KEY_LINE_WIDTH);
    }

    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.settings.auto_rotate = auto_rotate;
        self.persist(KEY_AUTO_ROTATE);
    }

    pub fn set_auto_rotate_speed(&mut self, speed: f64) {
        self.settings.auto_rotate_speed = speed;
        self.persist(KEY_AUTO_ROTATE_SPEED);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    // -- driving --

    /// Advances one animation frame.
    ///
    /// Picks up a finished bulk result, if any, then takes one Euler step
    /// when the active attractor is a curve.
    pub fn tick(&mut self) {
        self.poll_bulk();
        if self.active.kind() == AttractorKind::Curve {
            self.step_curve();
        }
    }

    fn step_curve(&mut self) {
        let delta = match self.active.curve_delta(self.coordinate, self.multiplier) {
            Ok(delta) => delta,
            Err(e) => {
                log::warn!("curve step skipped: {e}");
                return;
            }
        };
        self.coordinate += delta;
        self.buffer.append(self.coordinate);
        if self.buffer.detect_divergence() {
            self.recover_divergence();
        }
    }

    fn recover_divergence(&mut self) {
        log::warn!(
            "'{}' diverged at multiplier {}, restarting trajectory",
            self.active.id,
            self.multiplier
        );
        self.buffer.clear();
        self.coordinate = self.active.origin();
        self.notify(Notification::divergence(self.multiplier));
    }

    // -- bulk computation --

    /// Dispatches a bulk computation, superseding any in-flight one.
    ///
    /// The buffer is left as is until the result arrives; failures are reported
    /// as events and never touch it. Only a result for the active attractor is
    /// installed. A request naming any other id ends in a failed event.
    pub fn dispatch(&mut self, request: BulkRequest) {
        self.cancel_bulk();
        self.generation += 1;
        let generation = self.generation;
        log::debug!(
            "dispatching bulk {generation}: '{}' x{} at multiplier {}",
            request.id,
            request.max,
            request.multiplier
        );
        self.events.push(SessionEvent::BulkStarted {
            generation,
            id: request.id.clone(),
            max: request.max,
        });
        match BulkTask::spawn(Arc::clone(&self.catalog), request, generation) {
            Ok(task) => self.bulk = Some(task),
            Err(error) => self.fail_bulk(generation, error),
        }
    }

    /// Whether a bulk computation is in flight.
    pub fn is_computing(&self) -> bool {
        self.bulk.is_some()
    }

    /// Non-blocking check for a finished bulk result.
    pub fn poll_bulk(&mut self) {
        let outcome = match self.bulk.as_mut().and_then(BulkTask::try_take) {
            Some(outcome) => outcome,
            None => return,
        };
        self.bulk = None;
        self.apply_outcome(outcome);
    }

    /// Blocks until the in-flight computation reports and applies its result.
    ///
    /// Returns `false` when nothing was in flight.
    pub fn wait_for_bulk(&mut self) -> bool {
        match self.bulk.take() {
            Some(task) => {
                let outcome = task.wait();
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    fn apply_outcome(&mut self, outcome: BulkOutcome) {
        if outcome.generation != self.generation {
            log::debug!(
                "discarding superseded bulk {} (current {})",
                outcome.generation,
                self.generation
            );
            return;
        }
        match outcome.result {
            Ok(_) if outcome.id != self.active.id => {
                let error = AttractorError::BulkFailed(format!(
                    "result for '{}' does not belong to active attractor '{}'",
                    outcome.id, self.active.id
                ));
                self.fail_bulk(outcome.generation, error);
            }
            Ok(points) => {
                log::debug!("bulk {} finished with {} points", outcome.generation, points.len());
                self.buffer.replace(points);
                if self.buffer.detect_divergence() {
                    self.recover_divergence();
                }
                self.events.push(SessionEvent::BulkSucceeded {
                    generation: outcome.generation,
                    points: self.buffer.snapshot(),
                });
            }
            Err(error) => self.fail_bulk(outcome.generation, error),
        }
    }

    fn fail_bulk(&mut self, generation: u64, error: AttractorError) {
        log::warn!("bulk {generation} failed: {error}");
        self.notify(Notification::bulk_failed(&error));
        self.events.push(SessionEvent::BulkFailed { generation, error });
    }

    /// Supersedes the in-flight task. Reported as a failed event without a notification.
    fn cancel_bulk(&mut self) {
        if let Some(task) = self.bulk.take() {
            let generation = task.generation();
            log::debug!("cancelling bulk {generation} for '{}'", task.id());
            task.cancel();
            self.events.push(SessionEvent::BulkFailed {
                generation,
                error: AttractorError::Cancelled,
            });
        }
    }

    /// Recomputes the point cloud of the active point attractor.
    fn refresh_points(&mut self) {
        if self.active.kind() != AttractorKind::Point {
            return;
        }
        let request = BulkRequest {
            id: self.active.id.clone(),
            max: self.buffer.max_points(),
            multiplier: self.multiplier,
            constants: self.active.simple_constants(),
        };
        self.dispatch(request);
    }

    // -- notifications and events --

    fn notify(&mut self, notification: Notification) {
        if self.notifications.show(notification.clone()) {
            self.events.push(SessionEvent::Notification(notification));
        }
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.dismiss(id)
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    /// Takes every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn persist(&self, key: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = self.settings.store_key(storage.as_ref(), key) {
                log::warn!("could not persist {key}: {e}");
            }
        }
    }

    // -- read access --

    /// Snapshot of the trajectory, oldest first.
    pub fn points(&self) -> Vec<DVec3> {
        self.buffer.snapshot()
    }

    pub fn buffer(&self) -> &TrajectoryBuffer {
        &self.buffer
    }

    pub fn active_attractor(&self) -> &Attractor {
        &self.active
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn coordinate(&self) -> DVec3 {
        self.coordinate
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_points(&self) -> usize {
        self.buffer.max_points()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current attractor, constants and stepping configuration as JSON.
    pub fn params(&self) -> Value {
        let constants: serde_json::Map<String, Value> = self
            .active
            .constants
            .iter()
            .map(|c| (c.id.clone(), json!(c.value)))
            .collect();
        json!({
            "attractor": self.active.id,
            "kind": self.active.kind(),
            "multiplier": self.multiplier,
            "maxPoints": self.buffer.max_points(),
            "scale": self.scale,
            "constants": constants,
        })
    }

    /// Constants of the active attractor with display names and factories.
    pub fn param_schema(&self) -> Value {
        let constants: Vec<Value> = self
            .active
            .constants
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "name": c.name,
                    "value": c.value,
                    "factory": c.factory,
                })
            })
            .collect();
        json!({
            "attractor": self.active.entry(),
            "options": self.active.options,
            "constants": constants,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.active.id)
            .field("coordinate", &self.coordinate)
            .field("points", &self.buffer.len())
            .field("max_points", &self.buffer.max_points())
            .field("multiplier", &self.multiplier)
            .field("generation", &self.generation)
            .field("computing", &self.bulk.is_some())
            .finish()
    }
}
