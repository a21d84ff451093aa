/// 日志工具模块
///
/// 初始化 tracing（控制台 + 本次运行的日志文件），以及启动/统计信息的输出
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::models::RunStats;

/// 日志文件名：`sanctions_check_{YYYYMMDD_HHMMSS}.log`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("sanctions_check_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// 初始化日志
///
/// 默认级别为 info（`verbose_logging` 时为 debug），可用 `RUST_LOG` 覆盖。
/// 返回日志文件路径
pub fn init(config: &Config) -> Result<PathBuf> {
    fs::create_dir_all(&config.logs_dir)
        .with_context(|| format!("无法创建日志目录: {}", config.logs_dir.display()))?;

    let now = Local::now();
    let path = config.logs_dir.join(log_file_name(now));
    let mut file =
        File::create(&path).with_context(|| format!("无法创建日志文件: {}", path.display()))?;
    file.write_all(log_header(now).as_bytes())?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("日志系统初始化失败")?;

    info!("日志已配置，文件: {}", path.display());
    Ok(path)
}

fn log_header(now: DateTime<Local>) -> String {
    format!(
        "{}\n制裁名单核查日志 - {}\n{}\n\n",
        "=".repeat(60),
        now.format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    )
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 制裁名单核查");
    info!("🌐 搜索页面: {}", config.search_url);
    info!("🔁 单个主体最多搜索 {} 次", config.max_attempts);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行统计");
    info!(
        "完成时间: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("  主体总数:         {}", stats.total);
    info!("  ✅ 有命中 (OK):    {}", stats.ok);
    info!("  ☑️ 无命中 (NOK):   {}", stats.nok);
    info!("  档案缺失:         {}", stats.no_profile_match);
    info!("  信息不完整:       {}", stats.incomplete_profile);
    info!("  ❌ 错误:          {}", stats.errors);
    info!("{}", "=".repeat(60));
}
