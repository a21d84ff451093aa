//! 测试用的页面与存储替身
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sanctions_check::config::SearchSettings;
use sanctions_check::error::{AutomationError, AutomationResult, StoreError, StoreResult};
use sanctions_check::models::{IncompleteReportRow, Outcome, OutcomeStatus, Subject};
use sanctions_check::{PageProvider, SearchPage, SubjectStore};

pub const SEARCH_URL: &str = "http://localhost/search";

/// 无等待的搜索参数
pub fn fast_settings(max_attempts: usize) -> SearchSettings {
    SearchSettings {
        search_url: SEARCH_URL.to_string(),
        max_attempts,
        retry_backoff: Duration::ZERO,
        settle_delay: Duration::ZERO,
        reset_delay: Duration::ZERO,
        element_timeout: Duration::from_secs(1),
        zoom_percent: 60,
    }
}

pub fn subject(subject_id: i64, name: &str, address: Option<&str>, country: Option<&str>) -> Subject {
    Subject {
        row_id: subject_id,
        subject_id,
        name: name.to_string(),
        must_verify: true,
        address: address.map(str::to_string),
        country: country.map(str::to_string),
    }
}

// ========== 页面替身 ==========

/// 页面行为脚本
pub struct PageScript {
    /// 依次弹出，作为每次点击搜索的错误；为空时点击成功
    pub search_errors: VecDeque<AutomationError>,
    /// 按姓名指定结果提示文本
    pub indicators: HashMap<String, String>,
    /// 未指定姓名时的结果提示
    pub default_indicator: Option<String>,
    pub country_options: Vec<String>,
    pub missing_reset: bool,
    pub missing_address: bool,
    pub missing_country: bool,
    /// 前 N 次导航失败
    pub navigate_failures: usize,
    pub fail_screenshot: bool,
}

impl Default for PageScript {
    fn default() -> Self {
        Self {
            search_errors: VecDeque::new(),
            indicators: HashMap::new(),
            default_indicator: Some("0 Found".to_string()),
            country_options: vec![
                "All".to_string(),
                "Colombia".to_string(),
                "Korea, North".to_string(),
                "Venezuela".to_string(),
            ],
            missing_reset: false,
            missing_address: false,
            missing_country: false,
            navigate_failures: 0,
            fail_screenshot: false,
        }
    }
}

impl PageScript {
    pub fn fail_searches(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.search_errors
                .push_back(AutomationError::element_not_found("#btnSearch"));
        }
        self
    }

    pub fn indicator_for(mut self, name: &str, text: &str) -> Self {
        self.indicators.insert(name.to_string(), text.to_string());
        self
    }
}

/// 页面交互记录
#[derive(Debug, Default)]
pub struct PageLog {
    pub navigations: Vec<String>,
    pub zooms: usize,
    pub resets: usize,
    pub names: Vec<String>,
    pub addresses: Vec<String>,
    pub selected_countries: Vec<String>,
    pub searches: usize,
    pub screenshots: Vec<PathBuf>,
    pub closed: bool,
}

pub struct ScriptedPage {
    script: Arc<Mutex<PageScript>>,
    log: Arc<Mutex<PageLog>>,
    current_name: Option<String>,
}

impl ScriptedPage {
    pub fn new(script: PageScript) -> (Self, Arc<Mutex<PageLog>>) {
        let log = Arc::new(Mutex::new(PageLog::default()));
        let page = Self {
            script: Arc::new(Mutex::new(script)),
            log: log.clone(),
            current_name: None,
        };
        (page, log)
    }
}

#[async_trait]
impl SearchPage for ScriptedPage {
    async fn navigate(&mut self, url: &str) -> AutomationResult<()> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        let mut script = self.script.lock().unwrap();
        if script.navigate_failures > 0 {
            script.navigate_failures -= 1;
            return Err(AutomationError::NavigationFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    async fn set_zoom(&mut self, _percent: u32) -> AutomationResult<()> {
        self.log.lock().unwrap().zooms += 1;
        Ok(())
    }

    async fn click_reset(&mut self) -> AutomationResult<()> {
        if self.script.lock().unwrap().missing_reset {
            return Err(AutomationError::element_not_found("#btnReset"));
        }
        self.log.lock().unwrap().resets += 1;
        Ok(())
    }

    async fn fill_name(&mut self, name: &str) -> AutomationResult<()> {
        self.current_name = Some(name.to_string());
        self.log.lock().unwrap().names.push(name.to_string());
        Ok(())
    }

    async fn fill_address(&mut self, address: &str) -> AutomationResult<()> {
        if self.script.lock().unwrap().missing_address {
            return Err(AutomationError::element_not_found("#txtAddress"));
        }
        self.log.lock().unwrap().addresses.push(address.to_string());
        Ok(())
    }

    async fn country_options(&mut self) -> AutomationResult<Vec<String>> {
        let script = self.script.lock().unwrap();
        if script.missing_country {
            return Err(AutomationError::element_not_found("#ddlCountry"));
        }
        Ok(script.country_options.clone())
    }

    async fn select_country(&mut self, option: &str) -> AutomationResult<()> {
        self.log
            .lock()
            .unwrap()
            .selected_countries
            .push(option.to_string());
        Ok(())
    }

    async fn click_search(&mut self) -> AutomationResult<()> {
        self.log.lock().unwrap().searches += 1;
        match self.script.lock().unwrap().search_errors.pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn results_indicator(&mut self) -> AutomationResult<Option<String>> {
        let script = self.script.lock().unwrap();
        let by_name = self
            .current_name
            .as_ref()
            .and_then(|name| script.indicators.get(name))
            .cloned();
        Ok(by_name.or_else(|| script.default_indicator.clone()))
    }

    async fn screenshot(&mut self, path: &Path) -> AutomationResult<()> {
        if self.script.lock().unwrap().fail_screenshot {
            return Err(AutomationError::Driver("screenshot rejected".to_string()));
        }
        std::fs::write(path, b"\x89PNG").map_err(|e| AutomationError::Driver(e.to_string()))?;
        self.log.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(self) -> AutomationResult<()> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}

/// 每次打开都返回同一份脚本和记录的页面
pub struct FakeProvider {
    script: Arc<Mutex<PageScript>>,
    pub log: Arc<Mutex<PageLog>>,
    pub fail_open: bool,
    pub opened: Mutex<usize>,
}

impl FakeProvider {
    pub fn new(script: PageScript) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            log: Arc::new(Mutex::new(PageLog::default())),
            fail_open: false,
            opened: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(PageScript::default())
        }
    }
}

#[async_trait]
impl PageProvider for FakeProvider {
    type Page = ScriptedPage;

    async fn open_page(&self) -> AutomationResult<ScriptedPage> {
        *self.opened.lock().unwrap() += 1;
        if self.fail_open {
            return Err(AutomationError::LaunchFailed("no browser".to_string()));
        }
        Ok(ScriptedPage {
            script: self.script.clone(),
            log: self.log.clone(),
            current_name: None,
        })
    }
}

// ========== 存储替身 ==========

#[derive(Default)]
pub struct MemoryStore {
    pub subjects: Vec<Subject>,
    pub outcomes: Mutex<Vec<Outcome>>,
    /// 写入该主体时失败
    pub fail_record_for: Option<i64>,
    pub fail_fetch: bool,
}

impl MemoryStore {
    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        Self {
            subjects,
            ..Default::default()
        }
    }

    pub fn recorded(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<(i64, String)> {
        self.recorded()
            .into_iter()
            .map(|o| (o.subject_id, o.status))
            .collect()
    }

    fn failure() -> StoreError {
        StoreError::Database(sqlx::Error::PoolClosed)
    }
}

#[async_trait]
impl SubjectStore for MemoryStore {
    async fn fetch_subjects_to_verify(&self) -> StoreResult<Vec<Subject>> {
        if self.fail_fetch {
            return Err(Self::failure());
        }
        Ok(self.subjects.iter().filter(|s| s.must_verify).cloned().collect())
    }

    async fn record(&self, outcome: &Outcome) -> StoreResult<i64> {
        if self.fail_record_for == Some(outcome.subject_id) {
            return Err(Self::failure());
        }
        let mut outcomes = self.outcomes.lock().unwrap();
        let id = outcomes.len() as i64 + 1;
        outcomes.push(Outcome {
            id: Some(id),
            ..outcome.clone()
        });
        Ok(id)
    }

    async fn record_batch(&self, batch: &[Outcome]) -> StoreResult<usize> {
        for outcome in batch {
            self.record(outcome).await?;
        }
        Ok(batch.len())
    }

    async fn exists_outcome_for(&self, subject_id: i64) -> StoreResult<bool> {
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .iter()
            .any(|o| o.subject_id == subject_id))
    }

    async fn incomplete_report_rows(&self) -> StoreResult<Vec<IncompleteReportRow>> {
        let rows = self
            .recorded()
            .into_iter()
            .filter(|o| o.status == OutcomeStatus::IncompleteProfile.as_str())
            .map(|o| IncompleteReportRow {
                id: o.id.unwrap_or_default(),
                subject_id: o.subject_id,
                address: self
                    .subjects
                    .iter()
                    .find(|s| s.subject_id == o.subject_id)
                    .and_then(|s| s.address.clone()),
                name: o.name,
                country: o.country,
                match_count: o.match_count,
                status: o.status,
            })
            .collect();
        Ok(rows)
    }

    async fn all_outcomes(&self) -> StoreResult<Vec<Outcome>> {
        Ok(self.recorded())
    }
}
