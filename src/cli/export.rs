//! # export 子命令 CLI 定义
//!
//! 生成工作目录并复制到指定位置
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/export.rs`

use super::common::{InputFormat, RenderArgs};
use clap::Args;
use std::path::PathBuf;

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Result file (.json or .molden)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination directory (created if absent, existing files are overwritten)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    #[command(flatten)]
    pub render: RenderArgs,
}
