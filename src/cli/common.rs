//! # 共享 CLI 参数
//!
//! 输入格式与渲染选项，被 prepare / serve / export 复用。
//!
//! ## 依赖关系
//! - 被 `cli/` 各子命令使用
//! - 参数传递给 `commands/common.rs`

use crate::cubeview::cube::{DEFAULT_MARGIN, DEFAULT_RESOLUTION};
use clap::{Args, ValueEnum};
use std::fmt;

/// 输入文件格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Detect from the file extension
    #[default]
    Auto,
    /// JSON result dump
    Json,
    /// Molden file
    Molden,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Auto => write!(f, "auto"),
            InputFormat::Json => write!(f, "json"),
            InputFormat::Molden => write!(f, "molden"),
        }
    }
}

/// 渲染选项
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Orbitals to render, 1-based (e.g., '1,2,5-8'); alpha channel for unrestricted results
    #[arg(long)]
    pub mo: Option<String>,

    /// Beta orbitals to render for unrestricted results
    #[arg(long)]
    pub mo_beta: Option<String>,

    /// Number of dominant AO components listed per orbital (0 = none)
    #[arg(long, default_value_t = 0)]
    pub ao_component: usize,

    /// Grid resolution in Bohr
    #[arg(long, env = "CUBEVIEW_RESOLUTION", default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: f64,

    /// Margin around the molecule in Bohr
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: f64,

    /// Number of parallel jobs for grid evaluation (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
