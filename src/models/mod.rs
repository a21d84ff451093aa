//! 数据模型
//!
//! 存储层边界上的强类型记录，核心逻辑不接触原始行数据

pub mod outcome;
pub mod search;
pub mod stats;
pub mod subject;

pub use outcome::{IncompleteReportRow, Outcome, OutcomeStatus};
pub use search::SearchOutcome;
pub use stats::RunStats;
pub use subject::{is_blank, Subject, ABSENT_SENTINEL};
