//! # 轨道对称性标记
//!
//! 将每个轨道投影到点群各不可约表示的对称匹配 AO 组合上，取权重最大者。
//!
//! ```text
//! w_i = || B_i^T S c ||^2
//! ```
//!
//! `S` 为 AO 重叠矩阵（未给出时取单位矩阵），`B_i` 为第 i 个不可约表示的 AO 组合。
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs` 使用
//! - 使用 `models/molecule.rs`, `nalgebra`

use crate::error::{CubeViewError, Result};
use crate::models::PointGroup;
use nalgebra::DMatrix;

/// 计算每个轨道（列）的不可约表示标签
pub fn label_orbital_symmetry(
    group: &PointGroup,
    overlap: Option<&DMatrix<f64>>,
    coefficients: &DMatrix<f64>,
) -> Result<Vec<String>> {
    if group.irreps.is_empty() {
        return Err(CubeViewError::InvalidFormat(format!(
            "Point group {} declares no irreps",
            group.name
        )));
    }

    let nao = coefficients.nrows();
    for irrep in &group.irreps {
        if irrep.orbitals.nrows() != nao {
            return Err(CubeViewError::InvalidFormat(format!(
                "Irrep {} has {} rows but the MO coefficients have {}",
                irrep.name,
                irrep.orbitals.nrows(),
                nao
            )));
        }
    }

    // S c，每列对应一个轨道
    let sc = match overlap {
        Some(s) => s * coefficients,
        None => coefficients.clone(),
    };

    let weights: Vec<DMatrix<f64>> = group
        .irreps
        .iter()
        .map(|irrep| irrep.orbitals.transpose() * &sc)
        .collect();

    let labels = (0..coefficients.ncols())
        .map(|j| {
            let mut best = 0;
            let mut best_weight = f64::NEG_INFINITY;
            for (i, w) in weights.iter().enumerate() {
                let norm = w.column(j).norm_squared();
                if norm > best_weight {
                    best = i;
                    best_weight = norm;
                }
            }
            group.irreps[best].name.clone()
        })
        .collect();

    Ok(labels)
}
