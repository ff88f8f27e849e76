//! # 进度显示
//!
//! 封装 `indicatif`：cube 渲染进度条与文件读入 spinner。
//!
//! ## 依赖关系
//! - 被 `commands/common.rs`, `cubeview/view.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// cube 渲染进度条，消息显示当前文件名
pub fn cube_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cubes ({eta}) {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb
}

/// 读入文件时的 spinner
pub fn reading_spinner(what: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
            .unwrap()
            .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
    );
    pb.set_message(format!("Reading {}", what));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
