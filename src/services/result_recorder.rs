//! 结果记录 - 业务能力层
//!
//! 写入前校验结果的必填字段；写入失败原样返回给调用方，不在这里重试

use tracing::{debug, warn};

use crate::error::{StoreResult, ValidationError};
use crate::models::Outcome;
use crate::store::SubjectStore;

/// 结果记录服务
pub struct ResultRecorder<'a, S: SubjectStore> {
    store: &'a S,
}

impl<'a, S: SubjectStore> ResultRecorder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 结果是否满足写入条件
    pub fn validate(outcome: &Outcome) -> bool {
        Self::check(outcome).is_ok()
    }

    /// 逐项校验，返回第一个不满足的条件
    pub fn check(outcome: &Outcome) -> Result<(), ValidationError> {
        if outcome.subject_id <= 0 {
            return Err(ValidationError::NonPositiveSubjectId(outcome.subject_id));
        }
        if outcome.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if outcome.status.trim().is_empty() {
            return Err(ValidationError::BlankStatus);
        }
        Ok(())
    }

    /// 写入一条结果，返回分配的ID
    ///
    /// 调用前必须已通过 [`Self::validate`]；已有同一主体的结果时只告警，仍然追加
    pub async fn record(&self, outcome: &Outcome) -> StoreResult<i64> {
        debug_assert!(Self::validate(outcome), "recording an invalid outcome");

        match self.store.exists_outcome_for(outcome.subject_id).await {
            Ok(true) => warn!(
                "⚠️ 主体 {} 已有核查结果，本次结果将追加一条新记录",
                outcome.subject_id
            ),
            Ok(false) => {}
            Err(e) => debug!("重复检查失败 (主体 {}): {}", outcome.subject_id, e),
        }

        self.store.record(outcome).await
    }

    /// 批量写入，返回写入数量
    pub async fn record_batch(&self, outcomes: &[Outcome]) -> StoreResult<usize> {
        self.store.record_batch(outcomes).await
    }
}
