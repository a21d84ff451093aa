//! 证据截图 - 业务能力层
//!
//! 只负责"截图并按约定命名"能力；任何失败都只记录日志，返回 `None`

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use chrono::{Local, NaiveDate};
use tokio::fs;
use tracing::{debug, error, info};

use crate::error::{AppResult, FileError};
use crate::infrastructure::SearchPage;
use crate::services::search_session::SearchSession;

/// 截图文件名中的日期格式
pub const CAPTURE_DATE_FORMAT: &str = "%Y%m%d";

/// 证据截图服务
pub struct EvidenceCapture {
    directory: PathBuf,
}

impl EvidenceCapture {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// 截取会话当前页面，保存为 `{日期}_{subject_id}[_{后缀}].png`
    ///
    /// 同一天同一主体重复截图会覆盖旧文件
    pub async fn capture<P: SearchPage>(
        &self,
        session: &mut SearchSession<P>,
        subject_id: i64,
        suffix: Option<&str>,
    ) -> Option<PathBuf> {
        let path = self
            .directory
            .join(artifact_name(Local::now().date_naive(), subject_id, suffix));

        if let Err(e) = fs::create_dir_all(&self.directory).await {
            error!("创建截图目录失败 ({}): {}", self.directory.display(), e);
            return None;
        }

        match session.screenshot(&path).await {
            Ok(()) => {
                info!("📸 截图已保存: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("截图失败 (主体 {}): {}", subject_id, e);
                None
            }
        }
    }

    /// 目录中所有截图，按路径排序
    pub async fn list_captures(&self) -> AppResult<Vec<PathBuf>> {
        if !fs::try_exists(&self.directory).await? {
            return Ok(Vec::new());
        }

        let mut captures = Vec::new();
        let mut entries = fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("png") {
                captures.push(path);
            }
        }
        captures.sort();
        Ok(captures)
    }

    /// 删除修改时间早于 `days` 天前的截图，返回删除数量
    pub async fn prune_older_than(&self, days: u32) -> AppResult<usize> {
        let max_age = Duration::from_secs(u64::from(days) * 24 * 60 * 60);
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut removed = 0;
        for path in self.list_captures().await? {
            let modified = fs::metadata(&path).await?.modified()?;
            if modified < cutoff {
                fs::remove_file(&path).await.map_err(|e| FileError::WriteFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                debug!("已删除过期截图: {}", path.display());
                removed += 1;
            }
        }

        if removed > 0 {
            info!("🗑️ 已删除 {} 个过期截图", removed);
        }
        Ok(removed)
    }
}

/// 截图文件名：`{YYYYMMDD}_{subject_id}.png`，有后缀时为 `{YYYYMMDD}_{subject_id}_{后缀}.png`
pub fn artifact_name(date: NaiveDate, subject_id: i64, suffix: Option<&str>) -> String {
    let date = date.format(CAPTURE_DATE_FORMAT);
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{}_{}_{}.png", date, subject_id, suffix),
        None => format!("{}_{}.png", date, subject_id),
    }
}
