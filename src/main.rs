//! # cubeview - 分子轨道可视化工具
//!
//! 读取电子结构计算结果（JSON 导出或 Molden 文件），将分子轨道渲染为
//! gzip 压缩的 cube 文件，并通过浏览器端查看器展示。
//!
//! ## 子命令
//! - `prepare` - 生成工作目录
//! - `serve`   - 生成并启动本地查看器
//! - `export`  - 生成并导出查看器目录
//! - `inspect` - 打印轨道表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (结果文件解析)
//!   │     ├── cubeview/  (视图、元数据、cube 生成、工作目录)
//!   │     └── models/    (数据模型)
//!   ├── server.rs   (静态文件服务)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod cubeview;
mod error;
mod models;
mod parsers;
mod server;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
