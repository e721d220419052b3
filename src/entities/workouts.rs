use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub activity_type: String,

    pub duration_minutes: i32,

    /// `low`, `medium`, `high`, or empty when unspecified
    pub intensity: String,

    pub notes: String,

    /// Calendar date, `YYYY-MM-DD`
    pub performed_at: String,

    pub created_by: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
