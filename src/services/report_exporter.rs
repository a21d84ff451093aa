//! 报表导出 - 业务能力层
//!
//! 只负责把数据库中的结果写成 Excel / JSON 文件，不关心流程

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;
use tracing::info;

use crate::error::{AppResult, FileError};
use crate::models::{IncompleteReportRow, Outcome, RunStats};
use crate::store::SubjectStore;

const INCOMPLETE_SHEET: &str = "Incompletos";
const ALL_RESULTS_SHEET: &str = "Resultados";

const INCOMPLETE_HEADERS: [&str; 7] = [
    "id",
    "subject_id",
    "name",
    "address",
    "country",
    "match_count",
    "status",
];

const OUTCOME_HEADERS: [&str; 6] = ["id", "subject_id", "name", "country", "match_count", "status"];

/// 报表导出服务
pub struct ReportExporter {
    directory: PathBuf,
}

impl ReportExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// 导出信息不完整的结果：`reporte_incompletos_{YYYYMMDD}.xlsx`
    ///
    /// 没有记录时仍生成只有表头的文件
    pub async fn export_incomplete<S: SubjectStore>(&self, store: &S) -> AppResult<PathBuf> {
        let rows = store.incomplete_report_rows().await?;
        let path = self.prepare(&incomplete_report_name(Local::now().date_naive()))?;

        write_incomplete_workbook(&rows, &path)?;

        info!("📄 不完整档案报表已导出: {} ({} 条记录)", path.display(), rows.len());
        Ok(path)
    }

    /// 导出全部结果：`resultados_completos_{YYYYMMDD_HHMMSS}.xlsx`
    pub async fn export_all_outcomes<S: SubjectStore>(&self, store: &S) -> AppResult<PathBuf> {
        let outcomes = store.all_outcomes().await?;
        let file_name = format!(
            "resultados_completos_{}.xlsx",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.prepare(&file_name)?;

        write_outcomes_workbook(&outcomes, &path)?;

        info!("📄 全部结果已导出: {} ({} 条记录)", path.display(), outcomes.len());
        Ok(path)
    }

    /// 将运行统计写为 `run_summary_{YYYYMMDD_HHMMSS}.json`
    pub fn write_run_summary(&self, stats: &RunStats) -> AppResult<PathBuf> {
        #[derive(Serialize)]
        struct Summary<'a> {
            finished_at: String,
            #[serde(flatten)]
            stats: &'a RunStats,
        }

        let now = Local::now();
        let path = self.prepare(&format!("run_summary_{}.json", now.format("%Y%m%d_%H%M%S")))?;
        let summary = Summary {
            finished_at: now.to_rfc3339(),
            stats,
        };
        let json = serde_json::to_string_pretty(&summary).map_err(FileError::from)?;
        std::fs::write(&path, json).map_err(|e| FileError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("运行统计已保存: {}", path.display());
        Ok(path)
    }

    /// 确保目录存在，返回目标文件路径
    fn prepare(&self, file_name: &str) -> AppResult<PathBuf> {
        std::fs::create_dir_all(&self.directory).map_err(|source| FileError::CreateDirFailed {
            path: self.directory.display().to_string(),
            source,
        })?;
        Ok(self.directory.join(file_name))
    }
}

/// 不完整档案报表文件名
pub fn incomplete_report_name(date: NaiveDate) -> String {
    format!("reporte_incompletos_{}.xlsx", date.format("%Y%m%d"))
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), FileError> {
    let bold = Format::new().set_bold();
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    Ok(())
}

fn write_incomplete_workbook(rows: &[IncompleteReportRow], path: &Path) -> Result<(), FileError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(INCOMPLETE_SHEET)?;
    write_header(sheet, &INCOMPLETE_HEADERS)?;

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        sheet.write_number(r, 0, row.id as f64)?;
        sheet.write_number(r, 1, row.subject_id as f64)?;
        sheet.write_string(r, 2, row.name.as_str())?;
        sheet.write_string(r, 3, row.address.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 4, row.country.as_str())?;
        sheet.write_number(r, 5, f64::from(row.match_count))?;
        sheet.write_string(r, 6, row.status.as_str())?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_outcomes_workbook(outcomes: &[Outcome], path: &Path) -> Result<(), FileError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(ALL_RESULTS_SHEET)?;
    write_header(sheet, &OUTCOME_HEADERS)?;

    for (index, outcome) in outcomes.iter().enumerate() {
        let r = index as u32 + 1;
        if let Some(id) = outcome.id {
            sheet.write_number(r, 0, id as f64)?;
        }
        sheet.write_number(r, 1, outcome.subject_id as f64)?;
        sheet.write_string(r, 2, outcome.name.as_str())?;
        sheet.write_string(r, 3, outcome.country.as_str())?;
        sheet.write_number(r, 4, f64::from(outcome.match_count))?;
        sheet.write_string(r, 5, outcome.status.as_str())?;
    }

    workbook.save(path)?;
    Ok(())
}
