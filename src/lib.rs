//! # Sanctions Check
//!
//! 按制裁名单（OFAC 搜索页面）自动核查数据库中的主体，记录结果、保存证据截图
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器页面），只暴露能力
//! - `SearchPage` / `PageProvider` - 页面能力的抽象，`ChromePage` 为 chromiumoxide 实现
//! - `store/` - `SubjectStore` 抽象及其 SQLite 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个主体
//! - `classify` - 判断主体能否搜索
//! - `SearchSession` - 带重试的搜索状态机
//! - `EvidenceCapture` - 截图能力
//! - `ResultRecorder` - 校验并写入结果
//! - `ReportExporter` - Excel / JSON 报表
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个主体"的完整处理流程
//! - `SubjectCtx` - 上下文封装（序号 + 主体ID）
//! - `SubjectFlow` - 流程编排（search → capture → record）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 单次核查：分类、批量写入、逐个搜索、导出报表
//! - `orchestrator/app` - 资源初始化与收尾

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, SearchSettings};
pub use error::{AppError, AppResult, AutomationError, StoreError};
pub use infrastructure::{ChromeLauncher, PageProvider, SearchPage};
pub use models::{Outcome, OutcomeStatus, RunStats, SearchOutcome, Subject};
pub use orchestrator::{App, Pipeline};
pub use store::{SqliteSubjectStore, SubjectStore};
pub use workflow::{Disposition, SubjectCtx, SubjectFlow};
