//! # 统一错误处理模块
//!
//! 定义 cubeview 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 前置条件违反 (`ContractViolation`)：参数越界、系数矩阵与基组不匹配等，不可恢复
//! - 不支持的计算方法 (`UnsupportedMethod`)：选择视图策略时报告
//! - 工作目录缺失 (`DirectoryNotFound`)
//! - I/O、解析、网格计算、服务器错误：原样向上传播
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// cubeview 统一错误类型
#[derive(Error, Debug)]
pub enum CubeViewError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 视图构建错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unsupported method type: {0}")]
    UnsupportedMethod(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化 / 服务
    // ─────────────────────────────────────────────────────────────
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP server error: {0}")]
    Server(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CubeViewError>;
