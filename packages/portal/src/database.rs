use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::test_case;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("portal::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await;

    Ok(db)
}

/// Composite indexes that schema sync does not create.
async fn ensure_indexes(db: &DatabaseConnection) {
    // Test cases are always read per question in position order.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_test_case_question_position")
        .table(test_case::Entity)
        .col(test_case::Column::QuestionId)
        .col(test_case::Column::Position)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_test_case_question_position exists"),
        Err(e) => warn!(
            "Failed to create index idx_test_case_question_position: {}",
            e
        ),
    }
}
