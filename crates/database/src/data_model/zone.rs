use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use model::{
    geometry::{Point, Ring},
    zone::{ServiceZone, ZoneKind, ZoneStyle},
};
use sqlx::{prelude::FromRow, types::Json};
use utility::id::Id;

use super::DatabaseRow;
use crate::{DatabaseError, Result};

#[derive(Debug, Clone, FromRow)]
pub struct ZoneRow {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub boundary: Json<Vec<Point>>,
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_weight: i32,
    pub applicable_services: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl DatabaseRow for ZoneRow {
    type Model = ServiceZone;

    fn to_model(self) -> Result<Self::Model> {
        let id = u64::try_from(self.id)
            .map_err(|_| DatabaseError::Corrupt(format!("negative zone id {}", self.id)))?;
        let kind = self
            .kind
            .parse::<ZoneKind>()
            .map_err(|why| DatabaseError::Corrupt(why.to_string()))?;
        let stroke_weight = u32::try_from(self.stroke_weight).map_err(|_| {
            DatabaseError::Corrupt(format!("negative stroke weight {}", self.stroke_weight))
        })?;

        Ok(ServiceZone {
            id: Id::new(id),
            name: self.name,
            kind,
            boundary: Ring::new(self.boundary.0),
            style: ZoneStyle {
                fill_color: self.fill_color,
                fill_opacity: self.fill_opacity,
                stroke_color: self.stroke_color,
                stroke_weight,
            },
            applicable_services: self.applicable_services.into_iter().collect::<BTreeSet<_>>(),
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn from_model(zone: &ServiceZone) -> Result<Self> {
        let id = i64::try_from(zone.id.raw())
            .map_err(|_| DatabaseError::Corrupt(format!("zone id {} out of range", zone.id)))?;
        let stroke_weight = i32::try_from(zone.style.stroke_weight).map_err(|_| {
            DatabaseError::Corrupt(format!("stroke weight {} out of range", zone.style.stroke_weight))
        })?;

        Ok(Self {
            id,
            name: zone.name.clone(),
            kind: zone.kind.as_str().to_owned(),
            boundary: Json(zone.boundary.points().to_vec()),
            fill_color: zone.style.fill_color.clone(),
            fill_opacity: zone.style.fill_opacity,
            stroke_color: zone.style.stroke_color.clone(),
            stroke_weight,
            applicable_services: zone.applicable_services.iter().cloned().collect(),
            active: zone.active,
            created_at: zone.created_at,
            updated_at: zone.updated_at,
        })
    }
}
