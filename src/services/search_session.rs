//! 搜索会话 - 业务能力层
//!
//! 持有一个浏览器页面，负责"搜索单个主体"的状态机：
//!
//! ```text
//! Idle ─▶ FormReset ─▶ Submitted ─▶ ResultsExtracted
//!             ▲                         (成功)
//!             │  失败
//!        RetryPending ◀─ 任一步骤抛出自动化错误
//!             │  次数用尽
//!             ▼
//!         Exhausted
//! ```
//!
//! `search` 返回前状态回到 `Idle`，下一个主体从 `FormReset` 开始。
//! 重试前整页重新导航，而不是只重置表单：常见故障是页面状态失效。
//! 页面上没有 "N Found" 提示属于正常的 0 结果，不会触发重试。

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SearchSettings;
use crate::error::{AutomationError, AutomationResult};
use crate::infrastructure::SearchPage;
use crate::models::SearchOutcome;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FormReset,
    Submitted,
    ResultsExtracted,
    RetryPending,
    Exhausted,
}

/// 搜索会话
///
/// 由编排层独占，一次只服务一个主体
pub struct SearchSession<P: SearchPage> {
    page: P,
    settings: SearchSettings,
    state: SessionState,
}

impl<P: SearchPage> SearchSession<P> {
    pub fn new(page: P, settings: SearchSettings) -> Self {
        Self {
            page,
            settings,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 整页加载搜索页面，之后尝试设置缩放（失败只记录）
    pub async fn navigate(&mut self) -> AutomationResult<()> {
        self.page.navigate(&self.settings.search_url).await?;

        if let Err(e) = self.page.set_zoom(self.settings.zoom_percent).await {
            warn!("无法设置页面缩放: {}", e);
        } else {
            debug!("页面缩放已设置为 {}%", self.settings.zoom_percent);
        }

        self.state = SessionState::Idle;
        Ok(())
    }

    /// 搜索单个主体
    ///
    /// 页面错误按配置次数重试，用尽后返回 `SearchOutcome::Failure`；
    /// 只有浏览器会话断开才返回 `Err`
    pub async fn search(
        &mut self,
        name: &str,
        address: Option<&str>,
        country: Option<&str>,
    ) -> AutomationResult<SearchOutcome> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            match self.attempt(name, address, country).await {
                Ok(count) => {
                    info!("搜索完成 '{}': {} 个结果", name, count);
                    self.state = SessionState::Idle;
                    return Ok(SearchOutcome::Success { count });
                }
                Err(e) if e.is_session_lost() => {
                    self.state = SessionState::Idle;
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "第 {}/{} 次搜索失败 '{}': {}",
                        attempt, max_attempts, name, e
                    );
                    if attempt < max_attempts {
                        self.state = SessionState::RetryPending;
                        self.recover().await?;
                    }
                }
            }
        }

        self.state = SessionState::Exhausted;
        debug!("'{}' 的搜索次数已用尽", name);
        self.state = SessionState::Idle;
        Ok(SearchOutcome::Failure {
            reason: format!("failed after {} attempts", max_attempts),
        })
    }

    /// 截取当前页面
    pub async fn screenshot(&mut self, path: &Path) -> AutomationResult<()> {
        self.page.screenshot(path).await
    }

    /// 关闭会话，失败只记录
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            warn!("关闭浏览器会话失败: {}", e);
        }
    }

    /// 单次完整的填表-提交-解析流程
    async fn attempt(
        &mut self,
        name: &str,
        address: Option<&str>,
        country: Option<&str>,
    ) -> AutomationResult<u32> {
        self.state = SessionState::FormReset;
        self.reset_form().await;

        self.page.fill_name(name).await?;

        if let Some(address) = address {
            tolerate_missing(self.page.fill_address(address).await, "地址输入框")?;
        }

        if let Some(country) = country {
            self.apply_country(country).await?;
        }

        self.page.click_search().await?;
        self.state = SessionState::Submitted;
        sleep(self.settings.settle_delay).await;

        let indicator = self.page.results_indicator().await?;
        self.state = SessionState::ResultsExtracted;

        match indicator {
            Some(text) => Ok(parse_match_count(&text)),
            None => {
                debug!("页面上没有结果数量提示，按 0 个结果处理");
                Ok(0)
            }
        }
    }

    /// 点击重置按钮，失败不影响本次搜索
    async fn reset_form(&mut self) {
        match self.page.click_reset().await {
            Ok(()) => sleep(self.settings.reset_delay).await,
            Err(e) => warn!("重置表单失败: {}", e),
        }
    }

    /// 精确匹配国家选项，否则取第一个不区分大小写的包含匹配，都没有则不筛选国家
    async fn apply_country(&mut self, country: &str) -> AutomationResult<()> {
        let options = match tolerate_missing(self.page.country_options().await, "国家下拉框")? {
            Some(options) => options,
            None => return Ok(()),
        };

        match choose_country_option(&options, country) {
            Some(option) => {
                tolerate_missing(self.page.select_country(option).await, "国家下拉框")?;
            }
            None => warn!("国家 '{}' 不在下拉框中，不按国家筛选", country),
        }
        Ok(())
    }

    /// 等待后整页重新加载
    async fn recover(&mut self) -> AutomationResult<()> {
        sleep(self.settings.retry_backoff).await;
        match self.navigate().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_session_lost() => Err(e),
            // 下一次尝试会在同样的位置失败并计入次数
            Err(e) => {
                warn!("重新导航失败: {}", e);
                Ok(())
            }
        }
    }
}

/// 可选字段：元素不存在时记录并继续，其余错误照常返回
fn tolerate_missing<T>(
    result: AutomationResult<T>,
    what: &str,
) -> Result<Option<T>, AutomationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_missing_element() => {
            warn!("{}不存在: {}", what, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 从 "N Found" 提示中提取数量，没有数字时为 0
pub fn parse_match_count(text: &str) -> u32 {
    static FOUND: OnceLock<Regex> = OnceLock::new();
    let re = FOUND.get_or_init(|| Regex::new(r"(\d+)\s+Found").expect("valid regex"));

    re.captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// 选择国家下拉框中的选项
pub fn choose_country_option<'a>(options: &'a [String], country: &str) -> Option<&'a str> {
    let country = country.trim();
    if country.is_empty() {
        return None;
    }

    if let Some(exact) = options.iter().find(|o| o.as_str() == country) {
        return Some(exact);
    }

    let needle = country.to_lowercase();
    options
        .iter()
        .find(|o| o.to_lowercase().contains(&needle))
        .map(String::as_str)
}
