//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化目录、连接数据库、清理过期截图）
//! - 运行流水线并输出全局统计
//!
//! ### `pipeline` - 核查流水线
//! - 拉取主体 → 分类 → 批量写入提前结束的结果
//! - 独占一个搜索会话，逐个处理可搜索主体
//! - 汇总统计，触发报表导出
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! pipeline (处理 Vec<Subject>)
//!     ↓
//! workflow::SubjectFlow (处理单个 Subject)
//!     ↓
//! services (能力层：classify / search / capture / record / export)
//!     ↓
//! infrastructure + store (浏览器页面、数据库)
//! ```

pub mod app;
pub mod pipeline;

pub use app::App;
pub use pipeline::Pipeline;
