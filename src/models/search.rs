/// 单个主体的搜索结果
///
/// 只是流程中的临时值，由编排层转换为 `Outcome`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 成功解析出命中数量（可以为 0）
    Success { count: u32 },
    /// 重试耗尽
    Failure { reason: String },
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }

    /// 命中数量，失败时为 0
    pub fn match_count(&self) -> u32 {
        match self {
            SearchOutcome::Success { count } => *count,
            SearchOutcome::Failure { .. } => 0,
        }
    }
}
