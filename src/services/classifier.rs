//! 主体分类 - 业务能力层
//!
//! 按数据完整度把主体分为三组：档案缺失、档案不完整、可搜索。
//! 纯函数，不产生副作用，每组内保持输入顺序。

use tracing::{debug, info};

use crate::models::{Outcome, Subject};

/// 分类结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// 可搜索的主体
    pub eligible: Vec<Subject>,
    /// 档案表中没有数据的结果
    pub no_profile_match: Vec<Outcome>,
    /// 档案信息不完整的结果
    pub incomplete_profile: Vec<Outcome>,
}

impl ClassificationResult {
    pub fn len(&self) -> usize {
        self.eligible.len() + self.no_profile_match.len() + self.incomplete_profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 单个主体的归类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NoProfileMatch,
    IncompleteProfile,
    Eligible,
}

/// 依次判断两条规则，先命中者生效
pub fn classify_subject(subject: &Subject) -> Classification {
    if subject.has_no_profile() {
        Classification::NoProfileMatch
    } else if subject.has_blank_profile_field() {
        Classification::IncompleteProfile
    } else {
        Classification::Eligible
    }
}

/// 对本次运行的全部主体分类
pub fn classify(subjects: Vec<Subject>) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for subject in subjects {
        match classify_subject(&subject) {
            Classification::NoProfileMatch => {
                debug!("主体 {} 在档案表中不存在", subject.subject_id);
                result.no_profile_match.push(Outcome::no_profile_match(&subject));
            }
            Classification::IncompleteProfile => {
                debug!("主体 {} 档案信息不完整", subject.subject_id);
                result
                    .incomplete_profile
                    .push(Outcome::incomplete_profile(&subject));
            }
            Classification::Eligible => result.eligible.push(subject),
        }
    }

    info!(
        "分类完成: 可搜索 {}, 档案缺失 {}, 信息不完整 {}",
        result.eligible.len(),
        result.no_profile_match.len(),
        result.incomplete_profile.len()
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeStatus;
    use std::collections::HashSet;

    fn subject(id: i64, address: Option<&str>, country: Option<&str>) -> Subject {
        Subject {
            row_id: id,
            subject_id: id,
            name: format!("Persona {}", id),
            must_verify: true,
            address: address.map(str::to_string),
            country: country.map(str::to_string),
        }
    }

    #[test]
    fn missing_profile_row_is_no_profile_match() {
        let result = classify(vec![subject(1, None, None)]);
        assert_eq!(result.no_profile_match.len(), 1);
        let outcome = &result.no_profile_match[0];
        assert_eq!(outcome.status_kind(), Some(OutcomeStatus::NoProfileMatch));
        assert_eq!(outcome.match_count, 0);
        assert_eq!(outcome.country, "");
    }

    #[test]
    fn blank_field_with_profile_is_incomplete() {
        let cases = [
            subject(1, Some("Calle 1"), None),
            subject(2, None, Some("Colombia")),
            subject(3, Some("  "), Some("Colombia")),
            subject(4, Some("Calle 1"), Some("")),
            subject(5, Some("None"), Some("Colombia")),
            subject(6, Some("Calle 1"), Some("None")),
            subject(7, Some(""), Some("")),
        ];
        for case in cases {
            assert_eq!(
                classify_subject(&case),
                Classification::IncompleteProfile,
                "subject {:?}",
                case
            );
        }
    }

    #[test]
    fn incomplete_keeps_present_country() {
        let result = classify(vec![
            subject(1, None, Some("Peru")),
            subject(2, Some("Calle 1"), Some("None")),
        ]);
        assert_eq!(result.incomplete_profile[0].country, "Peru");
        assert_eq!(result.incomplete_profile[1].country, "");
        assert!(result
            .incomplete_profile
            .iter()
            .all(|o| o.status_kind() == Some(OutcomeStatus::IncompleteProfile) && o.match_count == 0));
    }

    #[test]
    fn complete_profile_is_eligible_and_unchanged() {
        let input = subject(9, Some("Av. Siempre Viva 742"), Some("Mexico"));
        let result = classify(vec![input.clone()]);
        assert_eq!(result.eligible, vec![input]);
        assert!(result.no_profile_match.is_empty());
        assert!(result.incomplete_profile.is_empty());
    }

    #[test]
    fn groups_partition_input_and_keep_order() {
        let input = vec![
            subject(1, None, None),
            subject(2, Some("A"), Some("Chile")),
            subject(3, Some("B"), None),
            subject(4, None, None),
            subject(5, Some("C"), Some("Peru")),
            subject(6, Some("None"), Some("Peru")),
        ];
        let total = input.len();
        let result = classify(input);

        assert_eq!(result.len(), total);

        let eligible: Vec<i64> = result.eligible.iter().map(|s| s.subject_id).collect();
        let no_profile: Vec<i64> = result.no_profile_match.iter().map(|o| o.subject_id).collect();
        let incomplete: Vec<i64> = result.incomplete_profile.iter().map(|o| o.subject_id).collect();
        assert_eq!(eligible, vec![2, 5]);
        assert_eq!(no_profile, vec![1, 4]);
        assert_eq!(incomplete, vec![3, 6]);

        let mut seen = HashSet::new();
        for id in eligible.iter().chain(&no_profile).chain(&incomplete) {
            assert!(seen.insert(*id), "subject {} appears twice", id);
        }
    }

    #[test]
    fn empty_input_yields_empty_groups() {
        assert!(classify(Vec::new()).is_empty());
    }
}
