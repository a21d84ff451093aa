use std::process::ExitCode;

use anyhow::Result;
use sanctions_check::utils::logging;
use sanctions_check::{App, Config, RunStats};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // 加载配置
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 配置加载失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 初始化日志
    if let Err(e) = logging::init(&config) {
        eprintln!("❌ 日志初始化失败: {:#}", e);
        return ExitCode::FAILURE;
    }

    tokio::select! {
        result = run(config) => match result {
            Ok(stats) => {
                info!("✅ 核查完成，共处理 {} 个主体", stats.total);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("❌ 运行失败: {:#}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("⚠️ 收到中断信号，停止运行");
            ExitCode::FAILURE
        }
    }
}

// 初始化并运行应用
async fn run(config: Config) -> Result<RunStats> {
    App::initialize(config).await?.run().await
}
