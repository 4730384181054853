//! Keeps a drawing surface in sync with the registry.

use std::collections::HashMap;

use model::zone::ServiceZone;
use utility::id::Id;

use crate::lifecycle::ZoneLifecycle;

/// A map or canvas that can show zones. Each drawn zone is identified by a
/// surface specific handle.
pub trait RenderSurface: Send {
    type Handle: Send;

    fn draw(&mut self, zone: &ServiceZone) -> Self::Handle;

    fn redraw(&mut self, handle: &mut Self::Handle, zone: &ServiceZone);

    fn set_highlighted(&mut self, handle: &mut Self::Handle, highlighted: bool);

    fn remove(&mut self, handle: Self::Handle);
}

/// Maps zone ids to the surface handles drawn for them.
pub struct RenderAdapter<S: RenderSurface> {
    surface: S,
    handles: HashMap<Id<ServiceZone>, S::Handle>,
}

impl<S: RenderSurface> RenderAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            handles: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_drawn(&self, id: Id<ServiceZone>) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Draws zones that already existed before the adapter was attached.
    pub fn sync<'a, I>(&mut self, zones: I)
    where
        I: IntoIterator<Item = &'a ServiceZone>,
    {
        for zone in zones {
            self.on_zone_updated(zone);
        }
    }
}

impl<S: RenderSurface> ZoneLifecycle for RenderAdapter<S> {
    fn on_zone_created(&mut self, zone: &ServiceZone) {
        if let Some(previous) = self.handles.remove(&zone.id) {
            self.surface.remove(previous);
        }
        let handle = self.surface.draw(zone);
        self.handles.insert(zone.id, handle);
    }

    fn on_zone_updated(&mut self, zone: &ServiceZone) {
        match self.handles.get_mut(&zone.id) {
            Some(handle) => self.surface.redraw(handle, zone),
            None => {
                let handle = self.surface.draw(zone);
                self.handles.insert(zone.id, handle);
            }
        }
    }

    fn on_zone_deleted(&mut self, id: Id<ServiceZone>) {
        if let Some(handle) = self.handles.remove(&id) {
            self.surface.remove(handle);
        }
    }

    fn on_selection_changed(
        &mut self,
        previous: Option<Id<ServiceZone>>,
        current: Option<Id<ServiceZone>>,
    ) {
        if let Some(handle) = previous.and_then(|id| self.handles.get_mut(&id)) {
            self.surface.set_highlighted(handle, false);
        }
        if let Some(handle) = current.and_then(|id| self.handles.get_mut(&id)) {
            self.surface.set_highlighted(handle, true);
        }
    }
}
