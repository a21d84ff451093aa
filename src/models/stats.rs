use serde::Serialize;

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub ok: usize,
    pub nok: usize,
    pub no_profile_match: usize,
    pub incomplete_profile: usize,
    pub errors: usize,
}

impl RunStats {
    /// 已落定的主体数量
    pub fn accounted(&self) -> usize {
        self.ok + self.nok + self.no_profile_match + self.incomplete_profile + self.errors
    }
}
