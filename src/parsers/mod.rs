//! # 解析器模块
//!
//! 读取外部电子结构程序导出的计算结果。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: json_result, molden

pub mod json_result;
pub mod molden;

use crate::error::{CubeViewError, Result};
use crate::models::ComputedResult;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_result_file(path: &Path) -> Result<ComputedResult> {
    if !path.exists() {
        return Err(CubeViewError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if name.ends_with(".json") {
        json_result::parse_json_result_file(path)
    } else if name.ends_with(".molden")
        || name.ends_with(".molden.input")
        || name.ends_with(".molf")
        || name.ends_with(".mold")
    {
        molden::parse_molden_file(path)
    } else {
        Err(CubeViewError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        )))
    }
}
