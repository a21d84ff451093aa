//! 建表语句
//!
//! 启动时执行，表已存在时不做任何修改

use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::error::StoreResult;

const CREATE_SUBJECTS: &str = r#"
    CREATE TABLE IF NOT EXISTS subjects (
        id          INTEGER PRIMARY KEY,
        subject_id  INTEGER NOT NULL,
        name        TEXT    NOT NULL,
        must_verify TEXT    NOT NULL DEFAULT 'No'
    )
"#;

const CREATE_SUBJECT_PROFILES: &str = r#"
    CREATE TABLE IF NOT EXISTS subject_profiles (
        subject_id INTEGER NOT NULL,
        address    TEXT,
        country    TEXT
    )
"#;

// subject_id 不设唯一约束：每次运行追加一行
const CREATE_OUTCOMES: &str = r#"
    CREATE TABLE IF NOT EXISTS outcomes (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_id  INTEGER NOT NULL,
        name        TEXT    NOT NULL,
        country     TEXT    NOT NULL DEFAULT '',
        match_count INTEGER NOT NULL DEFAULT 0,
        status      TEXT    NOT NULL,
        recorded_at TEXT    NOT NULL
    )
"#;

const CREATE_OUTCOMES_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_outcomes_status ON outcomes (status)";

/// 创建所需的表
pub async fn init_schema(pool: &Pool<Sqlite>) -> StoreResult<()> {
    for statement in [
        CREATE_SUBJECTS,
        CREATE_SUBJECT_PROFILES,
        CREATE_OUTCOMES,
        CREATE_OUTCOMES_STATUS_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("数据库表结构已就绪");
    Ok(())
}
