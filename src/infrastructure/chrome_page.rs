//! 基于 chromiumoxide 的搜索页面
//!
//! 表单操作通过 `JsExecutor` 执行脚本完成，导航和截图直接使用 `Page`

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::browser::{connect_to_browser, launch_headless_browser};
use crate::config::Config;
use crate::error::{AutomationError, AutomationResult};
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::page::{PageProvider, SearchPage};

/// 搜索页面上的元素选择器
pub mod selectors {
    pub const FORM: &str = "form";
    pub const NAME: &str = "#ctl00_MainContent_txtLastName";
    pub const ADDRESS: &str = "#ctl00_MainContent_txtAddress";
    pub const COUNTRY: &str = "#ctl00_MainContent_ddlCountry";
    pub const SEARCH: &str = "#ctl00_MainContent_btnSearch";
    pub const RESET: &str = "#ctl00_MainContent_btnReset";
}

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器启动器
///
/// 配置了调试端口时连接已有浏览器，否则启动新的浏览器
pub struct ChromeLauncher {
    debug_port: Option<u16>,
    headless: bool,
    chrome_executable: Option<String>,
    element_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            debug_port: config.browser_debug_port,
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
        }
    }
}

#[async_trait]
impl PageProvider for ChromeLauncher {
    type Page = ChromePage;

    async fn open_page(&self) -> AutomationResult<ChromePage> {
        let (browser, handler_task, owned) = match self.debug_port {
            Some(port) => {
                let (browser, task) = connect_to_browser(port).await?;
                (browser, task, false)
            }
            None => {
                let (browser, task) =
                    launch_headless_browser(self.headless, self.chrome_executable.as_deref())
                        .await?;
                (browser, task, true)
            }
        };

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AutomationError::LaunchFailed(format!("创建页面失败: {}", e)))?;
        debug!("已创建空白页面");

        Ok(ChromePage {
            executor: JsExecutor::new(page),
            browser,
            handler_task,
            owned,
            element_timeout: self.element_timeout,
        })
    }
}

/// 持有浏览器和页面的搜索页面实现
pub struct ChromePage {
    executor: JsExecutor,
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 浏览器是否由本程序启动（连接模式下不关闭浏览器）
    owned: bool,
    element_timeout: Duration,
}

impl ChromePage {
    /// 轮询等待元素出现
    async fn wait_for(&self, selector: &str) -> AutomationResult<()> {
        let deadline = Instant::now() + self.element_timeout;
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        loop {
            if self.executor.eval_as::<bool>(script.as_str()).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AutomationError::Timeout {
                    what: selector.to_string(),
                    secs: self.element_timeout.as_secs(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 设置输入框的值并触发 input/change 事件
    async fn set_input(&self, selector: &str, value: &str) -> AutomationResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return "missing";
                if (el.disabled || el.readOnly) return "disabled";
                el.value = "";
                el.value = {};
                el.dispatchEvent(new Event("input", {{ bubbles: true }}));
                el.dispatchEvent(new Event("change", {{ bubbles: true }}));
                return "ok";
            }})()
            "#,
            serde_json::to_string(selector)?,
            serde_json::to_string(value)?
        );
        let status: String = self.executor.eval_as(js_code).await?;
        element_status(selector, &status)
    }
}

#[async_trait]
impl SearchPage for ChromePage {
    async fn navigate(&mut self, url: &str) -> AutomationResult<()> {
        debug!("正在导航到: {}", url);
        self.executor
            .page()
            .goto(url)
            .await
            .map_err(|e| AutomationError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        self.wait_for(selectors::FORM).await?;
        info!("已导航到: {}", url);
        Ok(())
    }

    async fn set_zoom(&mut self, percent: u32) -> AutomationResult<()> {
        self.executor
            .eval(format!("document.body.style.zoom = '{}%'", percent))
            .await?;
        Ok(())
    }

    async fn click_reset(&mut self) -> AutomationResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return "missing";
                el.click();
                return "ok";
            }})()
            "#,
            serde_json::to_string(selectors::RESET)?
        );
        let status: String = self.executor.eval_as(js_code).await?;
        element_status(selectors::RESET, &status)
    }

    async fn fill_name(&mut self, name: &str) -> AutomationResult<()> {
        self.wait_for(selectors::NAME).await?;
        self.set_input(selectors::NAME, name).await
    }

    async fn fill_address(&mut self, address: &str) -> AutomationResult<()> {
        self.set_input(selectors::ADDRESS, address).await
    }

    async fn country_options(&mut self) -> AutomationResult<Vec<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return null;
                return Array.from(el.options).map(o => o.text.trim());
            }})()
            "#,
            serde_json::to_string(selectors::COUNTRY)?
        );
        let options: Option<Vec<String>> = self.executor.eval_as(js_code).await?;
        options.ok_or_else(|| AutomationError::element_not_found(selectors::COUNTRY))
    }

    async fn select_country(&mut self, option: &str) -> AutomationResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return "missing";
                const opt = Array.from(el.options).find(o => o.text.trim() === {});
                if (!opt) return "missing";
                el.value = opt.value;
                el.dispatchEvent(new Event("change", {{ bubbles: true }}));
                return "ok";
            }})()
            "#,
            serde_json::to_string(selectors::COUNTRY)?,
            serde_json::to_string(option)?
        );
        let status: String = self.executor.eval_as(js_code).await?;
        element_status(selectors::COUNTRY, &status)
    }

    async fn click_search(&mut self) -> AutomationResult<()> {
        self.wait_for(selectors::SEARCH).await?;
        let button = self.executor.page().find_element(selectors::SEARCH).await?;
        button.click().await.map_err(|e| {
            warn!("搜索按钮点击失败: {}", e);
            AutomationError::NotInteractable {
                selector: selectors::SEARCH.to_string(),
            }
        })?;
        Ok(())
    }

    async fn results_indicator(&mut self) -> AutomationResult<Option<String>> {
        let js_code = r#"
            (() => {
                const node = document.evaluate(
                    "//*[contains(text(), 'Found')]",
                    document,
                    null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE,
                    null
                ).singleNodeValue;
                return node ? node.textContent : null;
            })()
        "#;
        self.executor.eval_as(js_code).await
    }

    async fn screenshot(&mut self, path: &Path) -> AutomationResult<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.executor.page().save_screenshot(params, path).await?;
        Ok(())
    }

    async fn close(self) -> AutomationResult<()> {
        let ChromePage {
            executor,
            mut browser,
            handler_task,
            owned,
            ..
        } = self;

        if let Err(e) = executor.into_page().close().await {
            warn!("关闭页面失败: {}", e);
        }
        if owned {
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
        }
        handler_task.abort();
        info!("浏览器会话已关闭");
        Ok(())
    }
}

fn element_status(selector: &str, status: &str) -> AutomationResult<()> {
    match status {
        "ok" => Ok(()),
        "missing" => Err(AutomationError::element_not_found(selector)),
        _ => Err(AutomationError::NotInteractable {
            selector: selector.to_string(),
        }),
    }
}
