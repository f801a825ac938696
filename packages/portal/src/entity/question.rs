use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    pub cpu_time_limit: i32, // in milliseconds
    pub memory_limit: i32,   // in kilobytes

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
