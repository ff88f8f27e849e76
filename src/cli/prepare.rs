//! # prepare 子命令 CLI 定义
//!
//! 生成工作目录（orbitals.json, mol.xyz, cubes/）
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prepare.rs`

use super::common::{InputFormat, RenderArgs};
use clap::Args;
use std::path::PathBuf;

/// prepare 子命令参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Result file (.json or .molden)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Keep the workspace after the command exits
    #[arg(long, default_value_t = false)]
    pub keep: bool,
}
