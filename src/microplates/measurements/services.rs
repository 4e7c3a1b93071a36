use super::models::{self, Measurement, MeasurementCreate, RESOURCE_NAME};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::microplates::services::find_microplate;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::BTreeMap;

/// Most recent reading of every well that has one, in row-major well order.
///
/// One ordered pass over the plate's readings replaces a lookup per well: the
/// first reading seen for a well is its newest (ties go to the later insert).
pub async fn latest_per_well(
    db: &DatabaseConnection,
    microplate_id: i32,
) -> BusinessResult<Vec<Measurement>> {
    let plate = find_microplate(db, microplate_id).await?;

    let readings = models::Entity::find()
        .filter(models::Column::MicroplateId.eq(plate.id))
        .order_by_desc(models::Column::Timestamp)
        .order_by_desc(models::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    let mut latest: BTreeMap<(i32, i32), models::Model> = BTreeMap::new();
    for reading in readings {
        if reading.row < plate.rows && reading.column_index < plate.columns {
            latest
                .entry((reading.row, reading.column_index))
                .or_insert(reading);
        }
    }

    Ok(latest.into_values().map(Measurement::from).collect())
}

/// Every reading of a single well, newest first
pub async fn well_history(
    db: &DatabaseConnection,
    microplate_id: i32,
    row: i64,
    column: i64,
) -> BusinessResult<Vec<Measurement>> {
    let plate = find_microplate(db, microplate_id).await?;
    plate.check_well(row, column)?;

    let readings = models::Entity::find()
        .filter(models::Column::MicroplateId.eq(plate.id))
        .filter(models::Column::Row.eq(row))
        .filter(models::Column::ColumnIndex.eq(column))
        .order_by_desc(models::Column::Timestamp)
        .order_by_desc(models::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    Ok(readings.into_iter().map(Measurement::from).collect())
}

pub async fn create_measurement(
    db: &DatabaseConnection,
    microplate_id: i32,
    data: MeasurementCreate,
) -> BusinessResult<Measurement> {
    let fields = data.require_fields()?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    let plate = find_microplate(&txn, microplate_id).await?;
    let reading = fields.into_reading(&plate)?;

    let model = reading
        .into_active_model(plate.id, Utc::now())
        .insert(&txn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    tracing::debug!(
        "Recorded {}% confluency for plate {} well ({}, {})",
        model.confluency_percentage,
        model.microplate_id,
        model.row,
        model.column_index
    );
    Ok(model.into())
}
