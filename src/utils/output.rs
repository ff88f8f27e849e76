//! # 终端输出样式
//!
//! 统一的状态前缀：`[OK]`, `[ERR]`, `[WARN]`, `[*]`, `[SKIP]`, `[DONE]`，
//! 以及服务器请求日志与键值摘要。
//!
//! ## 依赖关系
//! - 被 `commands/`, `cubeview/view.rs`, `server.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误输出到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 对齐的键值行，例如 `  Method      : rhf`
pub fn print_field(key: &str, value: &str) {
    println!("  {:<12}: {}", key.bold(), value);
}

/// 单条 HTTP 请求日志，状态码按类别着色
pub fn print_request(method: &str, path: &str, status: u16) {
    let code = status.to_string();
    let code = match status {
        200..=299 => code.green(),
        400..=499 => code.yellow(),
        _ => code.red(),
    };
    println!("{} {} {} {}", "[HTTP]".cyan(), method, path, code);
}

/// 标题栏
pub fn print_header(title: &str) {
    let rule = "─".repeat(60);
    println!("\n{}", rule.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", rule.dimmed());
}
