use serde::{Deserialize, Serialize};

/// 源数据中表示"无值"的字面量，与 NULL 等价
pub const ABSENT_SENTINEL: &str = "None";

/// 待核查的主体（人员或实体）
///
/// 每次运行从数据库读取一次快照，流程中不会修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// 行ID
    pub row_id: i64,
    /// 外部主体ID
    pub subject_id: i64,
    /// 显示名称
    pub name: String,
    /// 是否需要核查
    pub must_verify: bool,
    /// 地址（来自关联的档案表，可能不存在）
    pub address: Option<String>,
    /// 国家（来自关联的档案表，可能不存在）
    pub country: Option<String>,
}

impl Subject {
    /// 档案表中没有任何数据（地址和国家都不存在）
    pub fn has_no_profile(&self) -> bool {
        self.address.is_none() && self.country.is_none()
    }

    /// 地址或国家为空
    pub fn has_blank_profile_field(&self) -> bool {
        is_blank(self.address.as_deref()) || is_blank(self.country.as_deref())
    }

    /// 原样保存的国家，空值统一为空字符串
    pub fn country_or_empty(&self) -> String {
        match &self.country {
            Some(country) if !is_blank(Some(country)) => country.clone(),
            _ => String::new(),
        }
    }

    /// 非空地址
    pub fn address_value(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }

    /// 非空国家
    pub fn country_value(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }
}

/// NULL、去空白后为空、或为 [`ABSENT_SENTINEL`] 都视为空
pub fn is_blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed == ABSENT_SENTINEL {
        None
    } else {
        Some(trimmed)
    }
}
