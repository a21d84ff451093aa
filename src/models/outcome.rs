use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::subject::Subject;

/// 核查结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// 搜索成功且有命中
    Ok,
    /// 无命中，或重试耗尽
    Nok,
    /// 档案表中没有该主体
    NoProfileMatch,
    /// 档案信息不完整
    IncompleteProfile,
}

impl OutcomeStatus {
    /// 写入数据库的状态字符串
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "OK",
            OutcomeStatus::Nok => "NOK",
            OutcomeStatus::NoProfileMatch => "NoProfileMatch",
            OutcomeStatus::IncompleteProfile => "IncompleteProfile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "OK" => Some(OutcomeStatus::Ok),
            "NOK" => Some(OutcomeStatus::Nok),
            "NoProfileMatch" => Some(OutcomeStatus::NoProfileMatch),
            "IncompleteProfile" => Some(OutcomeStatus::IncompleteProfile),
            _ => None,
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每个主体写回数据库的核查结果
///
/// `status` 以字符串保存，与数据库列一致；写入前由 `ResultRecorder` 校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// 数据库分配的ID
    pub id: Option<i64>,
    pub subject_id: i64,
    pub name: String,
    /// 国家，允许为空字符串
    pub country: String,
    pub match_count: u32,
    pub status: String,
}

impl Outcome {
    pub fn new(subject: &Subject, country: String, match_count: u32, status: OutcomeStatus) -> Self {
        Self {
            id: None,
            subject_id: subject.subject_id,
            name: subject.name.clone(),
            country,
            match_count,
            status: status.as_str().to_string(),
        }
    }

    /// 档案表中没有该主体
    pub fn no_profile_match(subject: &Subject) -> Self {
        Self::new(subject, String::new(), 0, OutcomeStatus::NoProfileMatch)
    }

    /// 档案信息不完整
    pub fn incomplete_profile(subject: &Subject) -> Self {
        Self::new(subject, subject.country_or_empty(), 0, OutcomeStatus::IncompleteProfile)
    }

    pub fn status_kind(&self) -> Option<OutcomeStatus> {
        OutcomeStatus::parse(&self.status)
    }
}

/// 不完整档案报表中的一行（结果关联回档案地址）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteReportRow {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub country: String,
    pub match_count: u32,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(country: Option<&str>) -> Subject {
        Subject {
            row_id: 1,
            subject_id: 42,
            name: "Carlos Ruiz".into(),
            must_verify: true,
            address: None,
            country: country.map(str::to_string),
        }
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            OutcomeStatus::Ok,
            OutcomeStatus::Nok,
            OutcomeStatus::NoProfileMatch,
            OutcomeStatus::IncompleteProfile,
        ] {
            assert_eq!(OutcomeStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OutcomeStatus::parse(""), None);
    }

    #[test]
    fn early_exit_outcomes_have_zero_matches() {
        let no_profile = Outcome::no_profile_match(&subject(None));
        assert_eq!(no_profile.country, "");
        assert_eq!(no_profile.match_count, 0);
        assert_eq!(no_profile.status_kind(), Some(OutcomeStatus::NoProfileMatch));

        let incomplete = Outcome::incomplete_profile(&subject(Some("Peru")));
        assert_eq!(incomplete.country, "Peru");
        assert_eq!(incomplete.match_count, 0);
        assert_eq!(incomplete.status, "IncompleteProfile");
    }
}
