//! 核查流水线 - 编排层
//!
//! 运行级别的顺序控制和统计。单个主体的失败只计数，不会中断运行；
//! 只有拉取主体列表和批量写入提前结束的结果失败时整个运行才会终止。

use tracing::{error, info, warn};

use crate::config::SearchSettings;
use crate::error::AppResult;
use crate::infrastructure::PageProvider;
use crate::models::{RunStats, Subject};
use crate::services::{classify, EvidenceCapture, ReportExporter, ResultRecorder, SearchSession};
use crate::store::SubjectStore;
use crate::workflow::{Disposition, SubjectCtx, SubjectFlow};

/// 核查流水线
pub struct Pipeline<'a, S: SubjectStore, L: PageProvider> {
    store: &'a S,
    launcher: &'a L,
    settings: SearchSettings,
    capture: EvidenceCapture,
    exporter: ReportExporter,
}

impl<'a, S: SubjectStore, L: PageProvider> Pipeline<'a, S, L> {
    pub fn new(
        store: &'a S,
        launcher: &'a L,
        settings: SearchSettings,
        capture: EvidenceCapture,
        exporter: ReportExporter,
    ) -> Self {
        Self {
            store,
            launcher,
            settings,
            capture,
            exporter,
        }
    }

    /// 执行一次完整的核查
    pub async fn run(&self) -> AppResult<RunStats> {
        let subjects = self.store.fetch_subjects_to_verify().await?;
        let mut stats = RunStats {
            total: subjects.len(),
            ..Default::default()
        };

        if subjects.is_empty() {
            warn!("⚠️ 没有需要核查的主体");
        }

        let classification = classify(subjects);
        let recorder = ResultRecorder::new(self.store);

        if !classification.no_profile_match.is_empty() {
            recorder.record_batch(&classification.no_profile_match).await?;
            stats.no_profile_match = classification.no_profile_match.len();
        }

        if !classification.incomplete_profile.is_empty() {
            recorder.record_batch(&classification.incomplete_profile).await?;
            stats.incomplete_profile = classification.incomplete_profile.len();
        }

        if !classification.eligible.is_empty() {
            self.search_eligible(&classification.eligible, &recorder, &mut stats)
                .await;
        }

        if let Err(e) = self.exporter.export_incomplete(self.store).await {
            error!("❌ 导出不完整档案报表失败: {}", e);
        }

        Ok(stats)
    }

    /// 逐个搜索可搜索主体
    ///
    /// 会话在所有路径上都会关闭；首次导航失败时全部计为错误
    async fn search_eligible(
        &self,
        eligible: &[Subject],
        recorder: &ResultRecorder<'_, S>,
        stats: &mut RunStats,
    ) {
        let page = match self.launcher.open_page().await {
            Ok(page) => page,
            Err(e) => {
                error!("❌ 无法打开浏览器: {}", e);
                stats.errors += eligible.len();
                return;
            }
        };

        let mut session = SearchSession::new(page, self.settings.clone());

        match session.navigate().await {
            Ok(()) => {
                info!("✓ 搜索页面已就绪，开始处理 {} 个主体", eligible.len());
                self.process_subjects(&mut session, eligible, recorder, stats)
                    .await;
            }
            Err(e) => {
                error!("❌ 无法访问搜索页面: {}", e);
                stats.errors += eligible.len();
            }
        }

        session.close().await;
    }

    async fn process_subjects<P: crate::infrastructure::SearchPage>(
        &self,
        session: &mut SearchSession<P>,
        eligible: &[Subject],
        recorder: &ResultRecorder<'_, S>,
        stats: &mut RunStats,
    ) {
        let flow = SubjectFlow::new(&self.capture, recorder);
        let total = eligible.len();

        for (index, subject) in eligible.iter().enumerate() {
            let ctx = SubjectCtx::new(index + 1, total, subject.subject_id);

            match flow.run(session, subject, &ctx).await {
                Ok(Disposition::Ok) => stats.ok += 1,
                Ok(Disposition::Nok) => stats.nok += 1,
                Ok(Disposition::Rejected) => stats.errors += 1,
                Err(e) => {
                    error!("{} ❌ 处理失败: {}", ctx, e);
                    stats.errors += 1;
                }
            }
        }
    }
}
