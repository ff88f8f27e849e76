//! # 分子轨道可视化
//!
//! 读入的计算结果 -> 视图策略 -> 工作目录（`orbitals.json`, `mol.xyz`, `cubes/`）
//! -> 静态文件服务或导出。
//!
//! ## 子模块
//! - `source`: 视图策略选择
//! - `metadata`: 轨道记录
//! - `symmetry`: 对称性标记
//! - `grid`: 网格与高斯基函数求值
//! - `cube`: cube 文件生成
//! - `workspace`: 临时工作目录
//! - `view`: prepare / serve / export / cleanup
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `server.rs`

pub mod cube;
pub mod grid;
pub mod metadata;
pub mod source;
pub mod symmetry;
pub mod view;
pub mod workspace;

pub use cube::CubeGenerator;
pub use source::OrbitalSource;
pub use view::{CubeView, PrepareOptions, PrepareSummary};

use crate::error::Result;
use crate::models::ComputedResult;

/// 为计算结果创建视图
pub fn viewer(result: ComputedResult) -> Result<CubeView> {
    CubeView::new(result)
}
