//! 配置管理
//!
//! 配置来源优先级：`config.toml` < `config.{APP_ENV}.toml` < `CAMPUS_*` 环境变量 < 显式环境变量覆盖。

mod loader;
mod structs;

pub use structs::*;
