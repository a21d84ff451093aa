//! 浏览器管理
//!
//! 两种方式获得浏览器：启动无头浏览器，或连接调试端口上已运行的浏览器

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;
