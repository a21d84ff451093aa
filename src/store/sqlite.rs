//! SQLite 实现（sqlx）

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::models::{IncompleteReportRow, Outcome, OutcomeStatus, Subject};
use crate::store::schema::init_schema;
use crate::store::{SubjectStore, MUST_VERIFY_YES};

const SELECT_SUBJECTS: &str = r#"
    SELECT s.id, s.subject_id, s.name, s.must_verify, p.address, p.country
    FROM subjects s
    LEFT JOIN subject_profiles p ON s.subject_id = p.subject_id
    WHERE s.must_verify = ?
    ORDER BY s.id
"#;

const INSERT_OUTCOME: &str = r#"
    INSERT INTO outcomes (subject_id, name, country, match_count, status, recorded_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

/// 基于 sqlx 连接池的 `SubjectStore`
#[derive(Clone)]
pub struct SqliteSubjectStore {
    pool: Pool<Sqlite>,
}

impl SqliteSubjectStore {
    /// 连接数据库并初始化表结构
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        info!("正在连接数据库: {}", database_url);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// 使用已有连接池
    pub async fn from_pool(pool: Pool<Sqlite>) -> StoreResult<Self> {
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("数据库连接池已关闭");
    }

    /// 需要核查的主体数量
    pub async fn count_subjects_to_verify(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE must_verify = ?")
            .bind(MUST_VERIFY_YES)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// 按状态查询结果
    pub async fn outcomes_by_status(&self, status: OutcomeStatus) -> StoreResult<Vec<Outcome>> {
        let rows = sqlx::query(
            r#"
            SELECT id, subject_id, name, country, match_count, status
            FROM outcomes
            WHERE status = ?
            ORDER BY id
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_outcome).collect()
    }
}

#[async_trait]
impl SubjectStore for SqliteSubjectStore {
    async fn fetch_subjects_to_verify(&self) -> StoreResult<Vec<Subject>> {
        let rows = sqlx::query(SELECT_SUBJECTS)
            .bind(MUST_VERIFY_YES)
            .fetch_all(&self.pool)
            .await?;

        let subjects = rows.iter().map(map_subject).collect::<StoreResult<Vec<_>>>()?;
        info!("获取到 {} 个待核查主体", subjects.len());
        Ok(subjects)
    }

    async fn record(&self, outcome: &Outcome) -> StoreResult<i64> {
        let result = bind_outcome(sqlx::query(INSERT_OUTCOME), outcome)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        debug!(
            "已写入结果 #{}: 主体 {} -> {}",
            id, outcome.subject_id, outcome.status
        );
        Ok(id)
    }

    async fn record_batch(&self, outcomes: &[Outcome]) -> StoreResult<usize> {
        if outcomes.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0usize;
        for outcome in outcomes {
            let result = bind_outcome(sqlx::query(INSERT_OUTCOME), outcome)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected() as usize;
        }
        tx.commit().await?;

        info!("批量写入 {} 条结果", written);
        Ok(written)
    }

    async fn exists_outcome_for(&self, subject_id: i64) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM outcomes WHERE subject_id = ?)")
                .bind(subject_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn incomplete_report_rows(&self) -> StoreResult<Vec<IncompleteReportRow>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.subject_id, o.name, p.address, o.country, o.match_count, o.status
            FROM outcomes o
            LEFT JOIN subject_profiles p ON o.subject_id = p.subject_id
            WHERE o.status = ?
            ORDER BY o.id
            "#,
        )
        .bind(OutcomeStatus::IncompleteProfile.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(IncompleteReportRow {
                    id: row.try_get("id")?,
                    subject_id: row.try_get("subject_id")?,
                    name: row.try_get("name")?,
                    address: row.try_get("address")?,
                    country: row.try_get("country")?,
                    match_count: match_count(row)?,
                    status: row.try_get("status")?,
                })
            })
            .collect()
    }

    async fn all_outcomes(&self) -> StoreResult<Vec<Outcome>> {
        let rows = sqlx::query(
            "SELECT id, subject_id, name, country, match_count, status FROM outcomes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_outcome).collect()
    }
}

// ========== 行映射 ==========

fn bind_outcome<'q>(
    query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    outcome: &'q Outcome,
) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(outcome.subject_id)
        .bind(outcome.name.as_str())
        .bind(outcome.country.as_str())
        .bind(i64::from(outcome.match_count))
        .bind(outcome.status.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
}

fn map_subject(row: &SqliteRow) -> StoreResult<Subject> {
    let must_verify: String = row.try_get("must_verify")?;
    Ok(Subject {
        row_id: row.try_get("id")?,
        subject_id: row.try_get("subject_id")?,
        name: row.try_get("name")?,
        must_verify: must_verify.trim() == MUST_VERIFY_YES,
        address: row.try_get("address")?,
        country: row.try_get("country")?,
    })
}

fn map_outcome(row: &SqliteRow) -> StoreResult<Outcome> {
    Ok(Outcome {
        id: Some(row.try_get("id")?),
        subject_id: row.try_get("subject_id")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        match_count: match_count(row)?,
        status: row.try_get("status")?,
    })
}

fn match_count(row: &SqliteRow) -> StoreResult<u32> {
    let raw: i64 = row.try_get("match_count")?;
    u32::try_from(raw).map_err(|_| StoreError::RowMapping {
        table: "outcomes".to_string(),
        reason: format!("match_count 超出范围: {}", raw),
    })
}
