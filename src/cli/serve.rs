//! # serve 子命令 CLI 定义
//!
//! 生成工作目录后启动本地静态文件服务，或直接服务已导出的目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/serve.rs`

use super::common::{InputFormat, RenderArgs};
use crate::server::DEFAULT_PORT;
use clap::Args;
use std::net::IpAddr;
use std::path::PathBuf;

/// serve 子命令参数
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Result file (.json or .molden)
    #[arg(short, long, required_unless_present = "dir", conflicts_with = "dir")]
    pub input: Option<PathBuf>,

    /// Serve an existing viewer directory instead of building one
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Port to listen on
    #[arg(short, long, env = "CUBEVIEW_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,
}
