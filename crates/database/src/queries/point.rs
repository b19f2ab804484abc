use model::point::{GeoPoint, StoredPoint};
use public_transport::database::Result;
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::point::PointRow;

use super::convert_error;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<StoredPoint>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as("SELECT id, longitude, latitude FROM points ORDER BY id ASC;")
        .fetch_all(executor)
        .await
        .map_err(convert_error)?
        .let_owned(|rows: Vec<PointRow>| {
            Ok(rows.into_iter().map(PointRow::to_model).collect())
        })
}

pub async fn insert<'c, E>(executor: E, point: GeoPoint) -> Result<StoredPoint>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO points(
            longitude,
            latitude
        )
        VALUES ($1, $2)
        RETURNING id, longitude, latitude;
        ",
    )
    .bind(point.longitude)
    .bind(point.latitude)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: PointRow| row.to_model())
}

pub async fn delete<'c, E>(executor: E, id: &Id<GeoPoint>) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM points WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .map(|result| result.rows_affected())
}

/// Deletes the oldest point with exactly these coordinates.
pub async fn delete_at<'c, E>(executor: E, point: &GeoPoint) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        DELETE FROM points
        WHERE id = (
            SELECT id FROM points
            WHERE longitude = $1 AND latitude = $2
            ORDER BY id ASC
            LIMIT 1
        );
        ",
    )
    .bind(point.longitude)
    .bind(point.latitude)
    .execute(executor)
    .await
    .map_err(convert_error)
    .map(|result| result.rows_affected())
}

/// Moves the oldest point with coordinates `old` to `new`.
pub async fn update_at<'c, E>(executor: E, old: &GeoPoint, new: GeoPoint) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        UPDATE points
        SET
            longitude = $3,
            latitude = $4
        WHERE id = (
            SELECT id FROM points
            WHERE longitude = $1 AND latitude = $2
            ORDER BY id ASC
            LIMIT 1
        );
        ",
    )
    .bind(old.longitude)
    .bind(old.latitude)
    .bind(new.longitude)
    .bind(new.latitude)
    .execute(executor)
    .await
    .map_err(convert_error)
    .map(|result| result.rows_affected())
}
