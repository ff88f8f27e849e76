//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `prepare`: 生成工作目录
//! - `serve`: 生成并启动本地查看器
//! - `export`: 生成并导出查看器目录
//! - `inspect`: 打印轨道表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, prepare, serve, export, inspect

pub mod common;
pub mod export;
pub mod inspect;
pub mod prepare;
pub mod serve;

use clap::{Parser, Subcommand};

/// cubeview - 分子轨道 cube 文件生成与浏览器查看
#[derive(Parser)]
#[command(name = "cubeview")]
#[command(version)]
#[command(about = "Render molecular orbitals to cube files and view them in the browser", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Build a viewer workspace (orbitals.json, mol.xyz, cubes/)
    Prepare(prepare::PrepareArgs),

    /// Build a viewer workspace and serve it over HTTP
    Serve(serve::ServeArgs),

    /// Build a viewer workspace and copy it to a directory
    Export(export::ExportArgs),

    /// Print the orbital table without rendering cube files
    Inspect(inspect::InspectArgs),
}
