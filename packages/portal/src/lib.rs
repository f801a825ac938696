pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod grading;
pub mod judge;
pub mod models;
pub mod state;
pub mod store;
