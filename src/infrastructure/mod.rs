//! 基础设施层
//!
//! 持有稀缺资源（浏览器页面），只暴露能力，不认识主体或核查结果

pub mod chrome_page;
pub mod js_executor;
pub mod page;

pub use chrome_page::{ChromeLauncher, ChromePage};
pub use js_executor::JsExecutor;
pub use page::{PageProvider, SearchPage};
