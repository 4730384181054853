//! Editor gestures (draw, select, edit, delete) applied to a registry.
//!
//! ```text
//!           begin_draw                 gesture_complete / cancel_draw
//!   Idle ──────────────▶ Drawing ─────────────────────────────────▶ Idle
//!    ▲ │ select
//!    │ ▼          begin_edit                  commit_edit / cancel_edit
//!   ZoneSelected ────────────▶ Editing ─────────────────────────▶ ZoneSelected
//! ```
//!
//! `deselect` returns to `Idle` from everywhere. Normalizing a finished
//! gesture happens inside `gesture_complete` and is never an observable state.

use model::{
    primitive::{DrawnPrimitive, ShapeKind},
    zone::{ServiceZone, ZoneKind, ZoneMetadata, ZonePatch},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    normalize::{normalize, validate_primitive},
    registry::ZoneRegistry,
    GeometryError, ZoneError, ZoneResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EditorState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Drawing { shape: ShapeKind, zone_kind: ZoneKind },
    #[serde(rename_all = "camelCase")]
    ZoneSelected { zone_id: Id<ServiceZone> },
    #[serde(rename_all = "camelCase")]
    Editing { zone_id: Id<ServiceZone> },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawing { .. } => "drawing",
            Self::ZoneSelected { .. } => "zoneSelected",
            Self::Editing { .. } => "editing",
        }
    }

    /// The highlighted zone, also while it is being edited.
    pub fn selected(&self) -> Option<Id<ServiceZone>> {
        match self {
            Self::ZoneSelected { zone_id } | Self::Editing { zone_id } => Some(*zone_id),
            _ => None,
        }
    }
}

pub struct InteractionMachine {
    registry: ZoneRegistry,
    state: EditorState,
}

impl InteractionMachine {
    pub fn new(registry: ZoneRegistry) -> Self {
        Self {
            registry,
            state: EditorState::Idle,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    fn rejected(&self, action: &'static str) -> ZoneError {
        ZoneError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Moves to `next` and announces a selection change when there is one.
    fn transition(&mut self, next: EditorState) -> EditorState {
        let previous = self.state.selected();
        self.state = next;
        self.registry.notify_selection(previous, next.selected());
        next
    }

    /// Starts drawing a new zone. A current selection is dropped.
    pub fn begin_draw(&mut self, shape: ShapeKind, zone_kind: ZoneKind) -> ZoneResult<EditorState> {
        match self.state {
            EditorState::Idle | EditorState::ZoneSelected { .. } => {
                Ok(self.transition(EditorState::Drawing { shape, zone_kind }))
            }
            _ => Err(self.rejected("begin drawing")),
        }
    }

    pub fn cancel_draw(&mut self) -> ZoneResult<EditorState> {
        match self.state {
            EditorState::Drawing { .. } => Ok(self.transition(EditorState::Idle)),
            _ => Err(self.rejected("cancel drawing")),
        }
    }

    /// Finishes the drawing gesture. The machine returns to `Idle` whether
    /// or not the zone could be created.
    pub fn gesture_complete(&mut self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        let EditorState::Drawing { shape, zone_kind } = self.state else {
            return Err(self.rejected("complete a gesture"));
        };
        self.transition(EditorState::Idle);

        if primitive.shape_kind() != shape {
            return Err(GeometryError::ShapeMismatch {
                expected: shape,
                actual: primitive.shape_kind(),
            }
            .into());
        }
        validate_primitive(&primitive)?;
        let boundary = normalize(primitive);
        self.registry
            .create(boundary, ZoneMetadata::new(format!("New {zone_kind} zone"), zone_kind))
    }

    pub fn select(&mut self, id: Id<ServiceZone>) -> ZoneResult<EditorState> {
        match self.state {
            EditorState::Idle | EditorState::ZoneSelected { .. } => {
                self.registry.get(id)?;
                Ok(self.transition(EditorState::ZoneSelected { zone_id: id }))
            }
            _ => Err(self.rejected("select a zone")),
        }
    }

    pub fn deselect(&mut self) -> EditorState {
        self.transition(EditorState::Idle)
    }

    /// Replaces the boundary of the selected zone in one step.
    pub fn edit(&mut self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        let EditorState::ZoneSelected { zone_id } = self.state else {
            return Err(self.rejected("edit the boundary"));
        };
        self.reshape(zone_id, primitive)
    }

    pub fn begin_edit(&mut self) -> ZoneResult<EditorState> {
        match self.state {
            EditorState::ZoneSelected { zone_id } => {
                Ok(self.transition(EditorState::Editing { zone_id }))
            }
            _ => Err(self.rejected("begin editing")),
        }
    }

    /// Applies the edited shape. On failure the editor stays in `Editing`
    /// so the gesture can be corrected.
    pub fn commit_edit(&mut self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        let EditorState::Editing { zone_id } = self.state else {
            return Err(self.rejected("commit an edit"));
        };
        let zone = self.reshape(zone_id, primitive)?;
        self.transition(EditorState::ZoneSelected { zone_id });
        Ok(zone)
    }

    pub fn cancel_edit(&mut self) -> ZoneResult<EditorState> {
        match self.state {
            EditorState::Editing { zone_id } => {
                Ok(self.transition(EditorState::ZoneSelected { zone_id }))
            }
            _ => Err(self.rejected("cancel editing")),
        }
    }

    /// Metadata changes (rename, restyle, toggle) of the selected zone.
    pub fn update_selected(&mut self, patch: ZonePatch) -> ZoneResult<ServiceZone> {
        let Some(zone_id) = self.state.selected() else {
            return Err(self.rejected("update the selection"));
        };
        self.registry.update(zone_id, patch)
    }

    pub fn delete(&mut self, id: Id<ServiceZone>) -> ZoneResult<()> {
        if let EditorState::Drawing { .. } = self.state {
            return Err(self.rejected("delete a zone"));
        }
        self.registry.delete(id)?;
        if self.state.selected() == Some(id) {
            self.transition(EditorState::Idle);
        }
        Ok(())
    }

    /// Creates a zone outside of a drawing gesture. The editor state is left
    /// as it is.
    pub fn create_zone(
        &mut self,
        primitive: DrawnPrimitive,
        metadata: ZoneMetadata,
    ) -> ZoneResult<ServiceZone> {
        validate_primitive(&primitive)?;
        self.registry.create(normalize(primitive), metadata)
    }

    pub fn update_zone(&mut self, id: Id<ServiceZone>, patch: ZonePatch) -> ZoneResult<ServiceZone> {
        self.registry.update(id, patch)
    }

    /// Loads persisted zones, see [`ZoneRegistry::restore`].
    pub fn restore<I>(&mut self, zones: I) -> usize
    where
        I: IntoIterator<Item = ServiceZone>,
    {
        self.registry.restore(zones)
    }

    fn reshape(
        &mut self,
        zone_id: Id<ServiceZone>,
        primitive: DrawnPrimitive,
    ) -> ZoneResult<ServiceZone> {
        validate_primitive(&primitive)?;
        self.registry
            .update(zone_id, ZonePatch::boundary(normalize(primitive)))
    }
}
