use super::models::{self, Microplate, MicroplateCreate, RESOURCE_NAME};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

pub async fn list_microplates(db: &DatabaseConnection) -> BusinessResult<Vec<Microplate>> {
    let plates = models::Entity::find()
        .order_by_asc(models::Column::Id)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    Ok(plates.into_iter().map(Microplate::from).collect())
}

/// Look up a plate on any connection, including an open transaction
pub async fn find_microplate<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> BusinessResult<models::Model> {
    models::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?
        .ok_or_else(|| crate::not_found!(RESOURCE_NAME, id))
}

pub async fn create_microplate(
    db: &DatabaseConnection,
    data: MicroplateCreate,
) -> BusinessResult<Microplate> {
    let new = data.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    // Dropping `txn` on any early return rolls it back
    let existing = models::Entity::find()
        .filter(models::Column::Name.eq(new.name.as_str()))
        .one(&txn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;
    if existing.is_some() {
        return Err(crate::duplicate_resource!(RESOURCE_NAME, "name"));
    }

    // A concurrent insert of the same name still fails here on the unique constraint
    let model = new
        .into_active_model(Utc::now())
        .insert(&txn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE_NAME))?;

    tracing::info!("Created microplate '{}' ({}x{})", model.name, model.rows, model.columns);
    Ok(model.into())
}

/// Create the reserved default plate unless one with that name already exists.
/// Returns the plate only when it was created by this call.
pub async fn seed_default_microplate(
    db: &DatabaseConnection,
    name: &str,
) -> BusinessResult<Option<Microplate>> {
    match create_microplate(db, MicroplateCreate::named(name)).await {
        Ok(plate) => Ok(Some(plate)),
        Err(BusinessError::Duplicate { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
