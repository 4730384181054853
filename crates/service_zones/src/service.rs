use std::sync::Arc;

use model::{
    geocode::{GeocodeCandidate, RegionBias},
    geometry::Point,
    primitive::{DrawnPrimitive, ShapeKind},
    route::{RouteOptions, RouteResult},
    zone::{ServiceZone, ZoneFilter, ZoneKind, ZoneMetadata, ZonePatch},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use utility::id::Id;

use crate::{
    geocoding::{Geocoder, GeocodingAdapter},
    interaction::{EditorState, InteractionMachine},
    routing::{DirectionsProvider, RoutePlanner},
    GeometryError, ZoneResult,
};

/// A geocoded address together with the zones it falls into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocatedAddress {
    #[serde(flatten)]
    pub candidate: GeocodeCandidate,
    pub zone_ids: Vec<Id<ServiceZone>>,
}

/// Shareable handle to the editor, registry and providers.
///
/// Zone state is serialized behind one lock. Provider calls run without
/// holding it, so a slow geocoder never blocks zone edits.
pub struct ZoneService<G, D> {
    machine: Arc<Mutex<InteractionMachine>>,
    geocoder: Arc<GeocodingAdapter<G>>,
    planner: Arc<RoutePlanner<D>>,
}

impl<G, D> Clone for ZoneService<G, D> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine.clone(),
            geocoder: self.geocoder.clone(),
            planner: self.planner.clone(),
        }
    }
}

impl<G: Geocoder, D: DirectionsProvider> ZoneService<G, D> {
    pub fn new(
        machine: InteractionMachine,
        geocoder: GeocodingAdapter<G>,
        planner: RoutePlanner<D>,
    ) -> Self {
        Self {
            machine: Arc::new(Mutex::new(machine)),
            geocoder: Arc::new(geocoder),
            planner: Arc::new(planner),
        }
    }

    // editor

    pub async fn editor_state(&self) -> EditorState {
        self.machine.lock().await.state()
    }

    pub async fn begin_draw(&self, shape: ShapeKind, kind: ZoneKind) -> ZoneResult<EditorState> {
        self.machine.lock().await.begin_draw(shape, kind)
    }

    pub async fn cancel_draw(&self) -> ZoneResult<EditorState> {
        self.machine.lock().await.cancel_draw()
    }

    pub async fn gesture_complete(&self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.gesture_complete(primitive)
    }

    pub async fn select(&self, id: Id<ServiceZone>) -> ZoneResult<EditorState> {
        self.machine.lock().await.select(id)
    }

    pub async fn deselect(&self) -> EditorState {
        self.machine.lock().await.deselect()
    }

    pub async fn edit(&self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.edit(primitive)
    }

    pub async fn begin_edit(&self) -> ZoneResult<EditorState> {
        self.machine.lock().await.begin_edit()
    }

    pub async fn commit_edit(&self, primitive: DrawnPrimitive) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.commit_edit(primitive)
    }

    pub async fn cancel_edit(&self) -> ZoneResult<EditorState> {
        self.machine.lock().await.cancel_edit()
    }

    pub async fn update_selected(&self, patch: ZonePatch) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.update_selected(patch)
    }

    // zones

    pub async fn create_zone(
        &self,
        primitive: DrawnPrimitive,
        metadata: ZoneMetadata,
    ) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.create_zone(primitive, metadata)
    }

    pub async fn update_zone(
        &self,
        id: Id<ServiceZone>,
        patch: ZonePatch,
    ) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.update_zone(id, patch)
    }

    pub async fn delete_zone(&self, id: Id<ServiceZone>) -> ZoneResult<()> {
        self.machine.lock().await.delete(id)
    }

    /// Deletes a zone and reports the editor state as it is right after the
    /// deletion, under the same lock.
    pub async fn delete_zone_with_state(&self, id: Id<ServiceZone>) -> ZoneResult<EditorState> {
        let mut machine = self.machine.lock().await;
        machine.delete(id)?;
        Ok(machine.state())
    }

    pub async fn zone(&self, id: Id<ServiceZone>) -> ZoneResult<ServiceZone> {
        self.machine.lock().await.registry().get(id).cloned()
    }

    pub async fn zones(&self, filter: &ZoneFilter) -> Vec<ServiceZone> {
        self.machine
            .lock()
            .await
            .registry()
            .list(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn restore(&self, zones: Vec<ServiceZone>) -> usize {
        self.machine.lock().await.restore(zones)
    }

    pub async fn zones_containing(&self, point: Point) -> ZoneResult<Vec<Id<ServiceZone>>> {
        ensure_valid(&point)?;
        Ok(self.machine.lock().await.registry().zones_containing(&point))
    }

    pub async fn eligible_zones(
        &self,
        point: Point,
        service: &str,
    ) -> ZoneResult<Vec<Id<ServiceZone>>> {
        ensure_valid(&point)?;
        Ok(self
            .machine
            .lock()
            .await
            .registry()
            .eligible_zones(&point, service))
    }

    // providers

    pub async fn geocode(
        &self,
        query: &str,
        bias: Option<&RegionBias>,
    ) -> ZoneResult<Vec<GeocodeCandidate>> {
        self.geocoder.resolve(query, bias).await
    }

    /// Geocodes `query` and tests every candidate for containment.
    pub async fn locate_address(
        &self,
        query: &str,
        bias: Option<&RegionBias>,
    ) -> ZoneResult<Vec<LocatedAddress>> {
        let candidates = self.geocoder.resolve(query, bias).await?;
        let machine = self.machine.lock().await;
        Ok(candidates
            .into_iter()
            .map(|candidate| LocatedAddress {
                zone_ids: machine.registry().zones_containing(&candidate.coordinate),
                candidate,
            })
            .collect())
    }

    pub async fn plan_route(
        &self,
        origin: Point,
        destination: Point,
        waypoints: Vec<Point>,
        options: Option<RouteOptions>,
    ) -> ZoneResult<RouteResult> {
        self.planner
            .plan(origin, destination, waypoints, options)
            .await
    }
}

fn ensure_valid(point: &Point) -> Result<(), GeometryError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(GeometryError::InvalidPoint(*point))
    }
}
