use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StepRecordRow {
    pub id: i64,
    pub email: String,
    pub steps: i32,
    pub date: DateTime<Utc>,
}
