use crate::common::errors::BusinessResult;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const RESOURCE_NAME: &str = "measurement";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "measurements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub microplate_id: i32,
    pub row: i32,
    #[sea_orm(column_name = "column")]
    pub column_index: i32,
    pub confluency_percentage: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::microplates::models::Entity",
        from = "Column::MicroplateId",
        to = "crate::microplates::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Microplates,
}

impl Related<crate::microplates::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Microplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A confluency reading as returned by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Measurement {
    pub id: i32,
    pub microplate_id: i32,
    pub row: i32,
    pub column: i32,
    pub confluency_percentage: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Model> for Measurement {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            microplate_id: model.microplate_id,
            row: model.row,
            column: model.column_index,
            confluency_percentage: model.confluency_percentage,
            timestamp: model.timestamp,
        }
    }
}

/// A number as sent by clients: either a JSON number or a numeric string
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// The finite numeric value, if there is one
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(number) => *number,
            NumericInput::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// The value as a whole number; fractional input is not a well index
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_index(&self) -> Option<i64> {
        let value = self.to_f64()?;
        // Bounded well below i64::MAX so the cast below is exact
        (value.fract() == 0.0 && value.abs() < 1e15).then_some(value as i64)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

/// Body of `POST /api/microplates/{id}/measurements`
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct MeasurementCreate {
    #[schema(value_type = Option<i32>, example = 0)]
    pub row: Option<NumericInput>,
    #[schema(value_type = Option<i32>, example = 1)]
    pub column: Option<NumericInput>,
    #[schema(value_type = Option<f64>, example = 55.5)]
    pub confluency_percentage: Option<NumericInput>,
}

impl MeasurementCreate {
    /// Presence check only; bounds depend on the target plate
    pub fn require_fields(self) -> BusinessResult<RequiredFields> {
        let row = self
            .row
            .ok_or_else(|| crate::validation_error!("row", "row is required"))?;
        let column = self
            .column
            .ok_or_else(|| crate::validation_error!("column", "column is required"))?;
        let confluency_percentage = self.confluency_percentage.ok_or_else(|| {
            crate::validation_error!(
                "confluency_percentage",
                "confluency_percentage is required"
            )
        })?;

        Ok(RequiredFields {
            row,
            column,
            confluency_percentage,
        })
    }
}

pub struct RequiredFields {
    pub row: NumericInput,
    pub column: NumericInput,
    pub confluency_percentage: NumericInput,
}

impl RequiredFields {
    /// Coerce and bounds-check against the owning plate
    pub fn into_reading(
        self,
        plate: &crate::microplates::models::Model,
    ) -> BusinessResult<WellReading> {
        let invalid = |field: &str| crate::validation_error!(field, "Invalid number format");

        let row = self.row.to_index().ok_or_else(|| invalid("row"))?;
        let column = self.column.to_index().ok_or_else(|| invalid("column"))?;
        plate.check_well(row, column)?;

        let confluency_percentage = self
            .confluency_percentage
            .to_f64()
            .ok_or_else(|| invalid("confluency_percentage"))?;
        if !(0.0..=100.0).contains(&confluency_percentage) {
            return Err(crate::validation_error!(
                "confluency_percentage",
                "Confluency percentage must be between 0 and 100"
            ));
        }

        // check_well bounded both indices by the plate's i32 dimensions
        Ok(WellReading {
            row: i32::try_from(row).unwrap_or_default(),
            column: i32::try_from(column).unwrap_or_default(),
            confluency_percentage,
        })
    }
}

/// A validated reading for one well of a known plate
#[derive(Clone, Debug, PartialEq)]
pub struct WellReading {
    pub row: i32,
    pub column: i32,
    pub confluency_percentage: f64,
}

impl WellReading {
    pub fn into_active_model(self, microplate_id: i32, timestamp: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            microplate_id: sea_orm::Set(microplate_id),
            row: sea_orm::Set(self.row),
            column_index: sea_orm::Set(self.column),
            confluency_percentage: sea_orm::Set(self.confluency_percentage),
            timestamp: sea_orm::Set(timestamp),
            ..Default::default()
        }
    }
}
