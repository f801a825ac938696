use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,
    pub question_id: Uuid,
    pub contest_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub language_id: String,
    /// One of:
    /// Pending, Accepted, WrongAnswer, CompilationError, RuntimeError, TimeLimitExceeded
    pub status: String,
    pub score: i16,

    pub submitted_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
