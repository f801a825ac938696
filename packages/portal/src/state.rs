use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::grading::Grader;
use crate::judge::{Judge0Client, JudgeError};
use crate::store::SeaStore;

/// Everything a command needs, built once from configuration.
#[derive(Clone)]
pub struct AppState {
    pub grader: Grader,
    pub store: SeaStore,
}

impl AppState {
    pub fn new(config: &AppConfig, db: DatabaseConnection) -> Result<Self, JudgeError> {
        let judge = Judge0Client::new(&config.judge)?;
        let store = SeaStore::new(db);
        let grader = Grader::new(
            Arc::new(judge),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            config.grading.clone(),
            config.judge.request_timeout(),
        );

        Ok(Self { grader, store })
    }
}
