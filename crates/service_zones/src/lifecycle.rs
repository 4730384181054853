use model::zone::ServiceZone;
use tokio::sync::mpsc;
use utility::id::Id;

/// Observer of committed zone mutations, e.g. a persistence layer or a map
/// renderer. Hooks are only called after the change is in the registry.
pub trait ZoneLifecycle: Send {
    fn on_zone_created(&mut self, _zone: &ServiceZone) {}

    fn on_zone_updated(&mut self, _zone: &ServiceZone) {}

    fn on_zone_deleted(&mut self, _id: Id<ServiceZone>) {}

    /// Visual selection changed. Not a data mutation.
    fn on_selection_changed(
        &mut self,
        _previous: Option<Id<ServiceZone>>,
        _current: Option<Id<ServiceZone>>,
    ) {
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    Created(ServiceZone),
    Updated(ServiceZone),
    Deleted(Id<ServiceZone>),
}

impl ZoneEvent {
    pub fn zone_id(&self) -> Id<ServiceZone> {
        match self {
            Self::Created(zone) | Self::Updated(zone) => zone.id,
            Self::Deleted(id) => *id,
        }
    }
}

/// Forwards data events to a channel so that slow consumers (database
/// writes) never block a registry mutation.
pub struct ChannelLifecycle {
    sender: mpsc::UnboundedSender<ZoneEvent>,
}

pub fn event_channel() -> (ChannelLifecycle, mpsc::UnboundedReceiver<ZoneEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelLifecycle { sender }, receiver)
}

impl ChannelLifecycle {
    fn send(&self, event: ZoneEvent) {
        let id = event.zone_id();
        if self.sender.send(event).is_err() {
            log::warn!("zone event for {id} dropped, receiver is gone");
        }
    }
}

impl ZoneLifecycle for ChannelLifecycle {
    fn on_zone_created(&mut self, zone: &ServiceZone) {
        self.send(ZoneEvent::Created(zone.clone()));
    }

    fn on_zone_updated(&mut self, zone: &ServiceZone) {
        self.send(ZoneEvent::Updated(zone.clone()));
    }

    fn on_zone_deleted(&mut self, id: Id<ServiceZone>) {
        self.send(ZoneEvent::Deleted(id));
    }
}
