//! # inspect 子命令 CLI 定义
//!
//! 打印轨道表，不生成 cube 文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use super::common::InputFormat;
use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Result file (.json or .molden)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Number of dominant AO components listed per orbital (0 = none)
    #[arg(long, default_value_t = 0)]
    pub ao_component: usize,

    /// Also write the table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Show at most this many rows per spin channel (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top_n: usize,
}
