use model::zone::ServiceZone;
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use super::convert_error;
use crate::{
    data_model::{zone::ZoneRow, DatabaseRow},
    DatabaseError, Result,
};

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<ServiceZone>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, kind, boundary, fill_color, fill_opacity, stroke_color,
            stroke_weight, applicable_services, active, created_at, updated_at
        FROM service_zones
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<ZoneRow>| Ok(readable_zones(rows)))
}

/// Converts rows into zones, skipping rows that no longer parse.
fn readable_zones(rows: Vec<ZoneRow>) -> Vec<ServiceZone> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.to_model() {
                Ok(zone) => Some(zone),
                Err(why) => {
                    log::warn!("Skipping stored zone {id}: {why}");
                    None
                }
            }
        })
        .collect()
}

pub async fn put<'c, E>(executor: E, zone: &ServiceZone) -> Result<ServiceZone>
where
    E: Executor<'c, Database = Postgres>,
{
    let row = ZoneRow::from_model(zone)?;
    sqlx::query_as(
        "
        INSERT INTO service_zones(
            id,
            name,
            kind,
            boundary,
            fill_color,
            fill_opacity,
            stroke_color,
            stroke_weight,
            applicable_services,
            active,
            created_at,
            updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (id)
        DO UPDATE SET
            name = EXCLUDED.name,
            kind = EXCLUDED.kind,
            boundary = EXCLUDED.boundary,
            fill_color = EXCLUDED.fill_color,
            fill_opacity = EXCLUDED.fill_opacity,
            stroke_color = EXCLUDED.stroke_color,
            stroke_weight = EXCLUDED.stroke_weight,
            applicable_services = EXCLUDED.applicable_services,
            active = EXCLUDED.active,
            updated_at = EXCLUDED.updated_at
        RETURNING id, name, kind, boundary, fill_color, fill_opacity, stroke_color,
            stroke_weight, applicable_services, active, created_at, updated_at;
        ",
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(&row.kind)
    .bind(&row.boundary)
    .bind(&row.fill_color)
    .bind(row.fill_opacity)
    .bind(&row.stroke_color)
    .bind(row.stroke_weight)
    .bind(&row.applicable_services)
    .bind(row.active)
    .bind(row.created_at)
    .bind(row.updated_at)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: ZoneRow| row.to_model())
}

pub async fn delete<'c, E>(executor: E, id: Id<ServiceZone>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let id = i64::try_from(id.raw())
        .map_err(|_| DatabaseError::Corrupt(format!("zone id {id} out of range")))?;
    let result = sqlx::query("DELETE FROM service_zones WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await
        .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use model::ExampleData;

    use super::*;

    #[test]
    fn corrupt_rows_are_skipped_on_load() {
        let zone = ServiceZone::example_data();
        let good = ZoneRow::from_model(&zone).unwrap();

        let mut unknown_kind = good.clone();
        unknown_kind.id = 2;
        unknown_kind.kind = "teleport".to_owned();
        let mut negative_weight = good.clone();
        negative_weight.id = 3;
        negative_weight.stroke_weight = -1;
        let mut negative_id = good.clone();
        negative_id.id = -4;

        let zones = readable_zones(vec![unknown_kind, good, negative_weight, negative_id]);
        assert_eq!(zones, vec![zone]);
    }

    #[test]
    fn no_rows_load_no_zones() {
        assert!(readable_zones(vec![]).is_empty());
    }
}
