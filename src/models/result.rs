//! # 外部计算结果数据模型
//!
//! 外部电子结构程序导出的计算结果：方法标记、分子以及轨道数据。
//! 视图策略的选择在 `cubeview::source` 中完成，这里只负责承载数据。
//!
//! ## 依赖关系
//! - 被 `parsers/json_result.rs`, `parsers/molden.rs` 生成
//! - 被 `cubeview/source.rs` 使用

use super::{Molecule, OrbitalSet};

/// 轨道数据的形状
#[derive(Debug, Clone)]
pub enum OrbitalPayload {
    /// 单一系数矩阵
    Restricted(OrbitalSet),

    /// alpha / beta 各一组
    Unrestricted { alpha: OrbitalSet, beta: OrbitalSet },
}

impl OrbitalPayload {
    pub fn shape_name(&self) -> &'static str {
        match self {
            OrbitalPayload::Restricted(_) => "a single coefficient matrix",
            OrbitalPayload::Unrestricted { .. } => "an alpha/beta pair of coefficient matrices",
        }
    }
}

/// 外部程序给出的计算结果
#[derive(Debug, Clone)]
pub struct ComputedResult {
    /// 方法标记，例如 `rhf`, `uks`, `casscf`；`None` 表示只给出了分子
    pub method: Option<String>,

    /// 分子
    pub molecule: Molecule,

    /// 轨道数据
    pub orbitals: Option<OrbitalPayload>,
}

impl ComputedResult {
    /// 仅分子 + 显式轨道
    pub fn from_molecule(molecule: Molecule, orbitals: Option<OrbitalSet>) -> Self {
        ComputedResult {
            method: None,
            molecule,
            orbitals: orbitals.map(OrbitalPayload::Restricted),
        }
    }

    /// 带方法标记的求解器结果
    pub fn from_method(method: impl Into<String>, molecule: Molecule, orbitals: OrbitalPayload) -> Self {
        ComputedResult {
            method: Some(method.into()),
            molecule,
            orbitals: Some(orbitals),
        }
    }
}
