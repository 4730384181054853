use chrono::Local;
use indexmap::IndexMap;
use model::{
    geometry::{Point, Ring},
    zone::{ServiceZone, ZoneFilter, ZoneMetadata, ZonePatch},
};
use utility::id::Id;

use crate::{
    containment, lifecycle::ZoneLifecycle, GeometryError, ZoneError, ZoneResult,
};

/// The in-memory source of truth for zones.
///
/// Zones are kept in insertion order; every successful mutation is reported
/// to each registered observer exactly once, after the mutation committed.
pub struct ZoneRegistry {
    // Index map preserves insertion order, which listing and containment
    // results are defined by.
    zones: IndexMap<Id<ServiceZone>, ServiceZone>,
    next_id: u64,
    observers: Vec<Box<dyn ZoneLifecycle>>,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self {
            zones: IndexMap::new(),
            next_id: 1,
            observers: vec![],
        }
    }

    pub fn with_observer<L: ZoneLifecycle + 'static>(mut self, observer: L) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer<L: ZoneLifecycle + 'static>(&mut self, observer: L) {
        self.observers.push(Box::new(observer));
    }

    /// Loads zones persisted earlier without notifying observers. Zones with
    /// an invalid boundary are skipped. Ids handed out afterwards are higher
    /// than any restored id.
    pub fn restore<I>(&mut self, zones: I) -> usize
    where
        I: IntoIterator<Item = ServiceZone>,
    {
        let mut restored = 0;
        for zone in zones {
            if let Err(why) = validate_ring(&zone.boundary) {
                log::warn!("skipping persisted zone {}: {}", zone.id, why);
                continue;
            }
            self.next_id = self.next_id.max(zone.id.raw() + 1);
            self.zones.insert(zone.id, zone);
            restored += 1;
        }
        log::info!("restored {restored} zones");
        restored
    }

    pub fn create(
        &mut self,
        boundary: Ring,
        metadata: ZoneMetadata,
    ) -> ZoneResult<ServiceZone> {
        validate_ring(&boundary)?;

        let id = Id::new(self.next_id);
        self.next_id += 1;
        let zone = ServiceZone::new(id, boundary, metadata, Local::now());
        self.zones.insert(id, zone.clone());
        log::info!("created zone {} ({}, {})", id, zone.name, zone.kind);

        for observer in self.observers.iter_mut() {
            observer.on_zone_created(&zone);
        }
        Ok(zone)
    }

    pub fn update(
        &mut self,
        id: Id<ServiceZone>,
        patch: ZonePatch,
    ) -> ZoneResult<ServiceZone> {
        // validate before touching the stored zone, a failed update must not
        // leave it half patched
        if let Some(boundary) = &patch.boundary {
            validate_ring(boundary)?;
        }
        let zone = self.zones.get_mut(&id).ok_or(ZoneError::NotFound(id))?;

        let ZonePatch {
            name,
            kind,
            boundary,
            style,
            applicable_services,
            active,
        } = patch;
        if let Some(name) = name {
            zone.name = name;
        }
        if let Some(kind) = kind {
            zone.kind = kind;
        }
        if let Some(boundary) = boundary {
            zone.boundary = boundary;
        }
        if let Some(style) = style {
            zone.style = style;
        }
        if let Some(services) = applicable_services {
            zone.applicable_services = services;
        }
        if let Some(active) = active {
            zone.active = active;
        }
        zone.updated_at = Local::now();

        let zone = zone.clone();
        log::info!("updated zone {id}");
        for observer in self.observers.iter_mut() {
            observer.on_zone_updated(&zone);
        }
        Ok(zone)
    }

    /// Removes a zone. Deleting an absent zone fails, also when it existed
    /// before.
    pub fn delete(&mut self, id: Id<ServiceZone>) -> ZoneResult<()> {
        self.zones
            .shift_remove(&id)
            .ok_or(ZoneError::NotFound(id))?;
        log::info!("deleted zone {id}");
        for observer in self.observers.iter_mut() {
            observer.on_zone_deleted(id);
        }
        Ok(())
    }

    pub fn get(&self, id: Id<ServiceZone>) -> ZoneResult<&ServiceZone> {
        self.zones.get(&id).ok_or(ZoneError::NotFound(id))
    }

    pub fn contains(&self, id: Id<ServiceZone>) -> bool {
        self.zones.contains_key(&id)
    }

    pub fn list(&self, filter: &ZoneFilter) -> Vec<&ServiceZone> {
        self.zones
            .values()
            .filter(|zone| filter.matches(zone))
            .collect()
    }

    /// All zones in insertion order.
    pub fn snapshot(&self) -> impl Iterator<Item = &ServiceZone> {
        self.zones.values()
    }

    pub fn zones_containing(&self, point: &Point) -> Vec<Id<ServiceZone>> {
        containment::zones_containing(point, self.snapshot())
    }

    pub fn eligible_zones(&self, point: &Point, service: &str) -> Vec<Id<ServiceZone>> {
        containment::eligible_zones(point, self.snapshot(), service)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub(crate) fn notify_selection(
        &mut self,
        previous: Option<Id<ServiceZone>>,
        current: Option<Id<ServiceZone>>,
    ) {
        if previous == current {
            return;
        }
        for observer in self.observers.iter_mut() {
            observer.on_selection_changed(previous, current);
        }
    }
}

/// A ring is accepted when all points are in range, at least three of them
/// are distinct and it encloses a non-zero area.
pub fn validate_ring(ring: &Ring) -> Result<(), GeometryError> {
    if let Some(point) = ring.points().iter().find(|point| !point.is_valid()) {
        return Err(GeometryError::InvalidPoint(*point));
    }
    let distinct = ring.distinct_points();
    if distinct < 3 {
        return Err(GeometryError::TooFewPoints { distinct });
    }
    if ring.is_degenerate() {
        return Err(GeometryError::ZeroArea);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use model::zone::{ZoneKind, ZoneStyle};

    use super::*;
    use crate::lifecycle::{event_channel, ZoneEvent};

    fn triangle() -> Ring {
        Ring::new(vec![
            Point::new(17.0, 78.0),
            Point::new(17.2, 78.1),
            Point::new(17.0, 78.2),
        ])
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut registry = ZoneRegistry::new();
        let metadata = ZoneMetadata::new("Kukatpally", ZoneKind::Emergency)
            .with_services(["ambulance"])
            .with_style(ZoneStyle {
                fill_color: "#000000".to_owned(),
                fill_opacity: 0.5,
                stroke_color: "#FFFFFF".to_owned(),
                stroke_weight: 4,
            });
        let created = registry.create(triangle(), metadata.clone()).unwrap();
        let fetched = registry.get(created.id).unwrap();

        assert_eq!(fetched.boundary, triangle());
        assert_eq!(fetched.metadata(), metadata);
        assert_eq!(fetched, &created);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut registry = ZoneRegistry::new();
        let metadata = ZoneMetadata::new("z", ZoneKind::Delivery);
        let a = registry.create(triangle(), metadata.clone()).unwrap().id;
        let b = registry.create(triangle(), metadata.clone()).unwrap().id;
        registry.delete(b).unwrap();
        let c = registry.create(triangle(), metadata).unwrap().id;
        assert!(a < b && b < c);
    }

    #[test]
    fn rings_with_fewer_than_three_distinct_points_are_rejected() {
        let mut registry = ZoneRegistry::new();
        let metadata = ZoneMetadata::new("z", ZoneKind::Delivery);
        let p = Point::new(1.0, 1.0);
        let q = Point::new(2.0, 2.0);
        for points in [vec![], vec![p], vec![p, q], vec![p, q, p, q], vec![p, p, p]] {
            let result = registry.create(Ring::new(points), metadata.clone());
            assert!(matches!(
                result,
                Err(ZoneError::InvalidGeometry(GeometryError::TooFewPoints { .. }))
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_area_and_out_of_range_rings_are_rejected() {
        let mut registry = ZoneRegistry::new();
        let metadata = ZoneMetadata::new("z", ZoneKind::Delivery);
        let collinear = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]);
        assert!(matches!(
            registry.create(collinear, metadata.clone()),
            Err(ZoneError::InvalidGeometry(GeometryError::ZeroArea))
        ));
        let out_of_range = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(91.0, 1.0),
            Point::new(0.0, 2.0),
        ]);
        assert!(matches!(
            registry.create(out_of_range, metadata),
            Err(ZoneError::InvalidGeometry(GeometryError::InvalidPoint(_)))
        ));
    }

    #[test]
    fn delete_is_not_idempotent() {
        let mut registry = ZoneRegistry::new();
        let id = registry
            .create(triangle(), ZoneMetadata::new("z", ZoneKind::Pickup))
            .unwrap()
            .id;
        registry.delete(id).unwrap();
        assert!(matches!(registry.get(id), Err(ZoneError::NotFound(missing)) if missing == id));
        assert!(matches!(registry.delete(id), Err(ZoneError::NotFound(_))));
    }

    #[test]
    fn update_applies_present_fields_only() {
        let mut registry = ZoneRegistry::new();
        let zone = registry
            .create(
                triangle(),
                ZoneMetadata::new("old", ZoneKind::Delivery).with_services(["a"]),
            )
            .unwrap();
        let updated = registry
            .update(
                zone.id,
                ZonePatch {
                    name: Some("new".to_owned()),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "new");
        assert!(!updated.active);
        assert_eq!(updated.kind, ZoneKind::Delivery);
        assert_eq!(updated.applicable_services, BTreeSet::from(["a".to_owned()]));
        assert_eq!(updated.boundary, triangle());
        assert_eq!(updated.created_at, zone.created_at);
    }

    #[test]
    fn invalid_boundary_update_leaves_zone_untouched() {
        let mut registry = ZoneRegistry::new();
        let zone = registry
            .create(triangle(), ZoneMetadata::new("z", ZoneKind::Delivery))
            .unwrap();
        let result = registry.update(
            zone.id,
            ZonePatch {
                name: Some("renamed".to_owned()),
                boundary: Some(Ring::new(vec![Point::new(0.0, 0.0)])),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ZoneError::InvalidGeometry(_))));
        assert_eq!(registry.get(zone.id).unwrap(), &zone);
    }

    #[test]
    fn update_of_unknown_zone_fails() {
        let mut registry = ZoneRegistry::new();
        assert!(matches!(
            registry.update(Id::new(42), ZonePatch::default()),
            Err(ZoneError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_and_keeps_insertion_order() {
        let mut registry = ZoneRegistry::new();
        let names = ["c", "a", "b"];
        for name in names {
            registry
                .create(triangle(), ZoneMetadata::new(name, ZoneKind::Delivery))
                .unwrap();
        }
        registry
            .create(
                triangle(),
                ZoneMetadata::new("off", ZoneKind::Premium).inactive(),
            )
            .unwrap();

        let all = registry.list(&ZoneFilter::default());
        let listed = all.iter().map(|zone| zone.name.as_str()).collect::<Vec<_>>();
        assert_eq!(listed, vec!["c", "a", "b", "off"]);

        let premium = registry.list(&ZoneFilter {
            kind: Some(ZoneKind::Premium),
            active: None,
        });
        assert_eq!(premium.len(), 1);
        let active = registry.list(&ZoneFilter {
            kind: None,
            active: Some(true),
        });
        assert_eq!(active.len(), 3);
    }

    #[test]
    fn observers_see_each_committed_mutation_once() {
        let (lifecycle, mut events) = event_channel();
        let mut registry = ZoneRegistry::new().with_observer(lifecycle);
        let metadata = ZoneMetadata::new("z", ZoneKind::Delivery);

        let zone = registry.create(triangle(), metadata.clone()).unwrap();
        let updated = registry
            .update(zone.id, ZonePatch::boundary(triangle()))
            .unwrap();
        registry.delete(zone.id).unwrap();
        // failures do not notify
        let _ = registry.create(Ring::new(vec![]), metadata);
        let _ = registry.delete(zone.id);

        assert_eq!(events.try_recv().unwrap(), ZoneEvent::Created(zone.clone()));
        assert_eq!(events.try_recv().unwrap(), ZoneEvent::Updated(updated));
        assert_eq!(events.try_recv().unwrap(), ZoneEvent::Deleted(zone.id));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn restore_continues_ids_and_stays_silent() {
        let (lifecycle, mut events) = event_channel();
        let mut registry = ZoneRegistry::new().with_observer(lifecycle);
        let persisted = vec![
            ServiceZone::new(
                Id::new(7),
                triangle(),
                ZoneMetadata::new("seven", ZoneKind::Delivery),
                Local::now(),
            ),
            ServiceZone::new(
                Id::new(3),
                Ring::new(vec![]),
                ZoneMetadata::new("broken", ZoneKind::Delivery),
                Local::now(),
            ),
        ];
        assert_eq!(registry.restore(persisted), 1);
        assert!(events.try_recv().is_err());

        let created = registry
            .create(triangle(), ZoneMetadata::new("next", ZoneKind::Pickup))
            .unwrap();
        assert_eq!(created.id, Id::new(8));
    }

    #[test]
    fn registry_answers_containment_queries() {
        let mut registry = ZoneRegistry::new();
        let zone = registry
            .create(
                triangle(),
                ZoneMetadata::new("z", ZoneKind::Delivery).with_services(["ambulance"]),
            )
            .unwrap();
        let centroid = zone.boundary.centroid().unwrap();
        assert_eq!(registry.zones_containing(&centroid), vec![zone.id]);
        assert_eq!(registry.eligible_zones(&centroid, "ambulance"), vec![zone.id]);
        assert!(registry.eligible_zones(&centroid, "pharmacy").is_empty());
    }
}
