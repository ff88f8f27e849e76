//! # 工具函数模块
//!
//! 提供美化输出、进度条、轨道选择解析等工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `cubeview/`, `server.rs` 使用
//! - 子模块: output, progress, selection

pub mod output;
pub mod progress;
pub mod selection;
