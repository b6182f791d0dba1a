//! Note entity - Free-form notes kept by the HR office.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Note database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title
    pub title: String,
    /// Body text
    pub content: String,
    /// When the note was written
    pub created_at: DateTimeUtc,
}

/// Notes have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
