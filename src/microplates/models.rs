use crate::common::errors::BusinessResult;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const RESOURCE_NAME: &str = "microplate";
pub const DEFAULT_ROWS: i32 = 2;
pub const DEFAULT_COLUMNS: i32 = 3;
/// Width of the `name` column in the store
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "microplates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub rows: i32,
    pub columns: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::measurements::models::Entity")]
    Measurements,
}

impl Related<super::measurements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measurements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rejects a well position that falls outside this plate's grid
    pub fn check_well(&self, row: i64, column: i64) -> BusinessResult<()> {
        if row < 0 || row >= i64::from(self.rows) {
            return Err(crate::validation_error!(
                "row",
                format!("Row must be between 0 and {}", self.rows - 1)
            ));
        }
        if column < 0 || column >= i64::from(self.columns) {
            return Err(crate::validation_error!(
                "column",
                format!("Column must be between 0 and {}", self.columns - 1)
            ));
        }
        Ok(())
    }
}

/// A microplate as returned by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Microplate {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub columns: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Microplate {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            rows: model.rows,
            columns: model.columns,
            created_at: model.created_at,
        }
    }
}

/// Body of `POST /api/microplates`. Only `name` is required.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct MicroplateCreate {
    #[schema(example = "Plate-A", max_length = 100)]
    pub name: Option<String>,
    #[schema(example = 2, minimum = 1)]
    pub rows: Option<i32>,
    #[schema(example = 3, minimum = 1)]
    pub columns: Option<i32>,
}

impl MicroplateCreate {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Validates the request and fills in the default grid size
    pub fn validate(self) -> BusinessResult<NewMicroplate> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(crate::validation_error!("name", "Name is required")),
        };
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(crate::validation_error!(
                "name",
                format!("Name must be at most {MAX_NAME_LENGTH} characters")
            ));
        }

        let rows = self.rows.unwrap_or(DEFAULT_ROWS);
        if rows < 1 {
            return Err(crate::validation_error!(
                "rows",
                "Rows must be a positive integer"
            ));
        }

        let columns = self.columns.unwrap_or(DEFAULT_COLUMNS);
        if columns < 1 {
            return Err(crate::validation_error!(
                "columns",
                "Columns must be a positive integer"
            ));
        }

        Ok(NewMicroplate {
            name,
            rows,
            columns,
        })
    }
}

/// A creation request that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMicroplate {
    pub name: String,
    pub rows: i32,
    pub columns: i32,
}

impl NewMicroplate {
    pub fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            name: sea_orm::Set(self.name),
            rows: sea_orm::Set(self.rows),
            columns: sea_orm::Set(self.columns),
            created_at: sea_orm::Set(created_at),
            ..Default::default()
        }
    }
}
