//! 应用入口 - 编排层
//!
//! 1. **初始化**：创建目录、连接数据库、清理过期截图
//! 2. **运行**：构建流水线并执行一次核查
//! 3. **收尾**：导出全部结果、关闭连接池、输出统计、保存运行摘要

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::ChromeLauncher;
use crate::models::RunStats;
use crate::orchestrator::pipeline::Pipeline;
use crate::services::{EvidenceCapture, ReportExporter};
use crate::store::SqliteSubjectStore;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    store: SqliteSubjectStore,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        for dir in [&config.capture_dir, &config.reports_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("无法创建目录: {}", dir.display()))?;
                info!("已创建目录: {}", dir.display());
            }
        }

        let store = SqliteSubjectStore::connect(&config.database_url, config.db_max_connections)
            .await
            .context("无法连接数据库")?;

        if let Some(days) = config.capture_retention_days {
            let capture = EvidenceCapture::new(&config.capture_dir);
            if let Err(e) = capture.prune_older_than(days).await {
                warn!("⚠️ 清理过期截图失败: {}", e);
            }
        }

        Ok(Self { config, store })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<RunStats> {
        let launcher = ChromeLauncher::new(&self.config);
        let pipeline = Pipeline::new(
            &self.store,
            &launcher,
            self.config.search_settings(),
            EvidenceCapture::new(&self.config.capture_dir),
            ReportExporter::new(&self.config.reports_dir),
        );

        let result = pipeline.run().await;

        let exporter = ReportExporter::new(&self.config.reports_dir);
        if result.is_ok() {
            if let Err(e) = exporter.export_all_outcomes(&self.store).await {
                warn!("⚠️ 导出全部结果失败: {}", e);
            }
        }
        self.store.close().await;

        let stats = result.context("核查流程终止")?;
        logging::print_final_stats(&stats);

        if let Err(e) = exporter.write_run_summary(&stats) {
            warn!("⚠️ 保存运行摘要失败: {}", e);
        }

        Ok(stats)
    }
}
