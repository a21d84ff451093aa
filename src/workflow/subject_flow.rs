//! 单个主体处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 搜索（会话内部重试）
//! 2. 有命中 → 截图（失败不影响后续）
//! 3. 构建结果 → 校验 → 写入
//!
//! 结果只在最后一步写入一次，中途退出不会留下半条记录

use tracing::{error, info, warn};

use crate::error::AppResult;
use crate::infrastructure::SearchPage;
use crate::models::{Outcome, OutcomeStatus, SearchOutcome, Subject};
use crate::services::{EvidenceCapture, ResultRecorder, SearchSession};
use crate::store::SubjectStore;
use crate::workflow::subject_ctx::SubjectCtx;

/// 单个主体的最终去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 有命中，已记录 OK
    Ok,
    /// 无命中或搜索失败，已记录 NOK
    Nok,
    /// 结果未通过校验，未写入
    Rejected,
}

/// 单个主体处理流程
///
/// - 不持有会话，由编排层每次传入
/// - 只依赖业务能力（services）
pub struct SubjectFlow<'a, S: SubjectStore> {
    capture: &'a EvidenceCapture,
    recorder: &'a ResultRecorder<'a, S>,
}

impl<'a, S: SubjectStore> SubjectFlow<'a, S> {
    pub fn new(capture: &'a EvidenceCapture, recorder: &'a ResultRecorder<'a, S>) -> Self {
        Self { capture, recorder }
    }

    pub async fn run<P: SearchPage>(
        &self,
        session: &mut SearchSession<P>,
        subject: &Subject,
        ctx: &SubjectCtx,
    ) -> AppResult<Disposition> {
        info!("{} 🔍 正在搜索: {}", ctx, subject.name);

        let search = session
            .search(&subject.name, subject.address_value(), subject.country_value())
            .await?;

        let status = match &search {
            SearchOutcome::Success { count } if *count > 0 => {
                if self.capture.capture(session, subject.subject_id, None).await.is_none() {
                    warn!("{} ⚠️ 截图失败，继续记录结果", ctx);
                }
                OutcomeStatus::Ok
            }
            SearchOutcome::Success { .. } => OutcomeStatus::Nok,
            SearchOutcome::Failure { reason } => {
                warn!("{} ⚠️ 搜索失败: {}", ctx, reason);
                OutcomeStatus::Nok
            }
        };

        let outcome = Outcome::new(
            subject,
            subject.country_or_empty(),
            search.match_count(),
            status,
        );

        if let Err(e) = ResultRecorder::<S>::check(&outcome) {
            error!("{} ❌ 结果校验失败，未写入: {}", ctx, e);
            return Ok(Disposition::Rejected);
        }

        let id = self.recorder.record(&outcome).await?;
        info!(
            "{} ✓ 已记录 #{}: {} ({} 个结果)",
            ctx, id, outcome.status, outcome.match_count
        );

        Ok(match status {
            OutcomeStatus::Ok => Disposition::Ok,
            _ => Disposition::Nok,
        })
    }
}
