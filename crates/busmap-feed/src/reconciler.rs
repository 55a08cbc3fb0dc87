//! Marker reconciliation.
//!
//! Applies each decoded feed message against the live marker set. Messages
//! are processed one at a time, in arrival order, on a single thread; the
//! marker set is mutated nowhere else. Across messages the reconciler
//! trusts arrival order on the connection — reconnection implies a fresh
//! reset from the server, which is the recovery mechanism for anything
//! lost in between.

use crate::codec::FeedMessage;
use busmap_core::{Marker, PositionUpdate, VehicleId};
use busmap_view::{icon_scale, style_for, MapSurface, OverlaySurface, OverlayTracker};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Summary of one `apply` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Working copy of one batch: updates keyed by vehicle, in first-seen
/// order. A duplicate id later in the batch overwrites the pending value
/// but keeps its original slot, so "new marker" iteration order is
/// deterministic.
struct WorkingSet {
    order: Vec<VehicleId>,
    updates: HashMap<VehicleId, PositionUpdate>,
}

impl WorkingSet {
    /// Build from a batch, excluding "no fix" sentinel entries.
    fn from_batch(positions: Vec<PositionUpdate>) -> Self {
        let mut order = Vec::with_capacity(positions.len());
        let mut updates = HashMap::with_capacity(positions.len());
        for position in positions {
            if !position.has_fix() {
                debug!(id = %position.id, "Skipping position without fix");
                continue;
            }
            let id = position.id;
            if updates.insert(id, position).is_none() {
                order.push(id);
            }
        }
        Self { order, updates }
    }

    /// Consume the pending update for a vehicle, if any.
    fn take(&mut self, id: VehicleId) -> Option<PositionUpdate> {
        self.updates.remove(&id)
    }

    /// Remaining updates, in first-seen order.
    fn drain_remaining(self) -> impl Iterator<Item = PositionUpdate> {
        let mut updates = self.updates;
        self.order
            .into_iter()
            .filter_map(move |id| updates.remove(&id))
    }
}

/// The live marker set and the logic that keeps it consistent.
pub struct MarkerReconciler {
    markers: BTreeMap<VehicleId, Marker>,
    zoom: f64,
    last_published: Option<DateTime<Utc>>,
}

impl MarkerReconciler {
    pub fn new(zoom: f64) -> Self {
        Self {
            markers: BTreeMap::new(),
            zoom,
            last_published: None,
        }
    }

    /// Number of live markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Look up one marker.
    pub fn get(&self, id: VehicleId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Live markers, in id order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Current zoom level used for styling new markers.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Timestamp of the last message that added at least one marker.
    ///
    /// In-place position updates deliberately do not bump this; only the
    /// appearance of a new vehicle counts as a publishable change.
    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        self.last_published
    }

    /// Apply one decoded message.
    ///
    /// Never fails past a message boundary: a surface error for one marker
    /// is logged and the rest of the batch still applies.
    pub fn apply<S, O>(
        &mut self,
        message: FeedMessage,
        surface: &mut S,
        overlay: &mut OverlayTracker<O>,
    ) -> Applied
    where
        S: MapSurface + ?Sized,
        O: OverlaySurface,
    {
        match message {
            FeedMessage::Reset { area, positions } => {
                debug!(%area, count = positions.len(), "Applying full reset");
                self.apply_reset(positions, surface, overlay)
            }
            FeedMessage::Batch { area, positions } => {
                debug!(%area, count = positions.len(), "Applying position batch");
                self.apply_batch(positions, surface, overlay)
            }
            FeedMessage::Expiry { area, expired } => {
                debug!(%area, count = expired.len(), "Applying expiry");
                self.apply_expiry(&expired, surface, overlay)
            }
        }
    }

    /// Recompute icon scales for the current zoom and push the new styles.
    ///
    /// Called when the zoom band changes; `ZoomWatcher` decides when that
    /// is, so this does not run per fractional zoom step.
    pub fn restyle<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        let scale = icon_scale(self.zoom);
        for marker in self.markers.values_mut() {
            marker.icon_scale = scale;
            if let Err(e) = surface.upsert_marker(marker, &style_for(&marker.line, self.zoom)) {
                warn!(id = %marker.id, error = %e, "Surface rejected restyle");
            }
        }
    }

    fn apply_reset<S, O>(
        &mut self,
        positions: Vec<PositionUpdate>,
        surface: &mut S,
        overlay: &mut OverlayTracker<O>,
    ) -> Applied
    where
        S: MapSurface + ?Sized,
        O: OverlaySurface,
    {
        let removed = self.markers.len();
        let selected = overlay.selected();

        self.markers.clear();
        if let Err(e) = surface.clear_markers() {
            warn!(error = %e, "Surface failed to clear markers");
        }

        let mut applied = self.apply_batch(positions, surface, overlay);
        applied.removed = removed;

        // The selection survives a reset only while its vehicle is still
        // part of the new snapshot.
        if let Some(id) = selected {
            match self.markers.get(&id) {
                Some(marker) => overlay.refresh(marker, self.zoom),
                None => overlay.marker_expired(id),
            }
        }

        applied
    }

    fn apply_batch<S, O>(
        &mut self,
        positions: Vec<PositionUpdate>,
        surface: &mut S,
        overlay: &mut OverlayTracker<O>,
    ) -> Applied
    where
        S: MapSurface + ?Sized,
        O: OverlaySurface,
    {
        let mut working = WorkingSet::from_batch(positions);
        let now = Utc::now();
        let mut applied = Applied::default();

        // Update pass: existing markers sighted in this batch.
        for marker in self.markers.values_mut() {
            let Some(update) = working.take(marker.id) else {
                continue;
            };
            marker.position = update.projected();
            if marker.line != update.line {
                marker.line = update.line;
            }
            marker.updated_at = now;
            if let Err(e) = surface.upsert_marker(marker, &style_for(&marker.line, self.zoom)) {
                warn!(id = %marker.id, error = %e, "Surface rejected marker update");
            }
            overlay.refresh(marker, self.zoom);
            applied.updated += 1;
        }

        // Creation pass: whatever remains is a vehicle we have not seen.
        for update in working.drain_remaining() {
            let position = update.projected();
            let marker = Marker {
                id: update.id,
                line: update.line,
                position,
                updated_at: now,
                icon_scale: icon_scale(self.zoom),
            };
            if let Err(e) = surface.upsert_marker(&marker, &style_for(&marker.line, self.zoom)) {
                // The marker still enters the set; the next sighting
                // retries the surface.
                warn!(id = %marker.id, error = %e, "Surface rejected new marker");
            }
            self.markers.insert(marker.id, marker);
            applied.created += 1;
        }

        if applied.created > 0 {
            self.last_published = Some(now);
        }
        applied
    }

    fn apply_expiry<S, O>(
        &mut self,
        expired: &[VehicleId],
        surface: &mut S,
        overlay: &mut OverlayTracker<O>,
    ) -> Applied
    where
        S: MapSurface + ?Sized,
        O: OverlaySurface,
    {
        let mut applied = Applied::default();
        for &id in expired {
            if self.markers.remove(&id).is_none() {
                continue;
            }
            if let Err(e) = surface.remove_marker(id) {
                warn!(%id, error = %e, "Surface failed to remove marker");
            }
            overlay.marker_expired(id);
            applied.removed += 1;
        }
        applied
    }
}
