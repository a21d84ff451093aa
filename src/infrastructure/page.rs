//! 搜索页面能力
//!
//! 每个方法对应一次远程页面交互，失败时返回 `AutomationError`。
//! 重试、重置、降级策略都在 `SearchSession` 中，这里不做任何决定。

use std::path::Path;

use async_trait::async_trait;

use crate::error::AutomationResult;

#[async_trait]
pub trait SearchPage: Send {
    /// 整页加载 `url` 并等待表单出现
    async fn navigate(&mut self, url: &str) -> AutomationResult<()>;

    /// 设置页面缩放
    async fn set_zoom(&mut self, percent: u32) -> AutomationResult<()>;

    /// 点击表单的重置按钮
    async fn click_reset(&mut self) -> AutomationResult<()>;

    /// 填写姓名（必填字段）
    async fn fill_name(&mut self, name: &str) -> AutomationResult<()>;

    /// 填写地址
    async fn fill_address(&mut self, address: &str) -> AutomationResult<()>;

    /// 国家下拉框的所有选项文本
    async fn country_options(&mut self) -> AutomationResult<Vec<String>>;

    /// 按选项文本选择国家
    async fn select_country(&mut self, option: &str) -> AutomationResult<()>;

    /// 点击搜索按钮
    async fn click_search(&mut self) -> AutomationResult<()>;

    /// 结果数量提示（"N Found"）的文本，页面上没有时返回 `None`
    async fn results_indicator(&mut self) -> AutomationResult<Option<String>>;

    /// 将当前页面截图保存到 `path`
    async fn screenshot(&mut self, path: &Path) -> AutomationResult<()>;

    /// 关闭页面并释放浏览器资源
    async fn close(self) -> AutomationResult<()>
    where
        Self: Sized;
}

/// 打开搜索页面的方式（启动浏览器或连接已有浏览器）
#[async_trait]
pub trait PageProvider: Send + Sync {
    type Page: SearchPage;

    async fn open_page(&self) -> AutomationResult<Self::Page>;
}
