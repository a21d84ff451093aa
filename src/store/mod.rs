//! 数据存储层
//!
//! `SubjectStore` 描述流程对数据库的全部需求；行数据在这一层映射为强类型记录。
//! 每个操作各自从连接池取连接，流程不会跨越搜索步骤持有连接。

pub mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{IncompleteReportRow, Outcome, Subject};

pub use sqlite::SqliteSubjectStore;

/// `must_verify` 列中表示"需要核查"的值
pub const MUST_VERIFY_YES: &str = "Si";

#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// 所有需要核查的主体，LEFT JOIN 档案表（地址/国家可能为 NULL）
    async fn fetch_subjects_to_verify(&self) -> StoreResult<Vec<Subject>>;

    /// 写入一条结果，返回分配的ID
    async fn record(&self, outcome: &Outcome) -> StoreResult<i64>;

    /// 一次事务写入多条结果，返回写入数量
    async fn record_batch(&self, outcomes: &[Outcome]) -> StoreResult<usize>;

    /// 是否已存在该主体的结果（仅用于重复处理告警）
    async fn exists_outcome_for(&self, subject_id: i64) -> StoreResult<bool>;

    /// 不完整档案的结果，关联回档案地址
    async fn incomplete_report_rows(&self) -> StoreResult<Vec<IncompleteReportRow>>;

    /// 全部结果
    async fn all_outcomes(&self) -> StoreResult<Vec<Outcome>>;
}
