//! 主体处理上下文
//!
//! 封装"正在处理第几个主体"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SubjectCtx {
    /// 在可搜索主体中的序号（从1开始）
    pub index: usize,
    /// 可搜索主体总数
    pub total: usize,
    pub subject_id: i64,
}

impl SubjectCtx {
    pub fn new(index: usize, total: usize, subject_id: i64) -> Self {
        Self {
            index,
            total,
            subject_id,
        }
    }
}

impl Display for SubjectCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} 主体#{}]", self.index, self.total, self.subject_id)
    }
}
