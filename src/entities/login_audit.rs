use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One row per login attempt. Rows are only ever inserted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "login_audit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Username as typed on the login form
    pub identifier: String,

    pub success: bool,

    pub reason: String,

    pub ip: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
