//! # 分子轨道数据模型
//!
//! - `OrbitalSet`: 系数矩阵（行 = AO，列 = 轨道）及可选的能量、占据数、对称性标签
//! - `OrbitalRecord`: `orbitals.json` 中的一条记录
//! - `Spin`: 自旋通道
//!
//! ## 依赖关系
//! - 被 `parsers/`, `cubeview/` 使用

use crate::error::{CubeViewError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// 自旋通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Alpha,
    Beta,
}

impl Spin {
    /// `orbitals.json` 中的自旋标记
    pub fn tag(self) -> &'static str {
        match self {
            Spin::Alpha => "a",
            Spin::Beta => "b",
        }
    }

    /// cube 文件名前缀
    pub fn name(self) -> &'static str {
        match self {
            Spin::Alpha => "alpha",
            Spin::Beta => "beta",
        }
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一组轨道
#[derive(Debug, Clone)]
pub struct OrbitalSet {
    /// 系数矩阵 (nao x nmo)
    pub coefficients: DMatrix<f64>,

    /// 轨道能量
    pub energies: Option<Vec<f64>>,

    /// 占据数
    pub occupations: Option<Vec<f64>>,

    /// 对称性标签
    pub irreps: Option<Vec<String>>,
}

impl OrbitalSet {
    pub fn new(coefficients: DMatrix<f64>) -> Self {
        OrbitalSet {
            coefficients,
            energies: None,
            occupations: None,
            irreps: None,
        }
    }

    pub fn with_energies(mut self, energies: Vec<f64>) -> Self {
        self.energies = Some(energies);
        self
    }

    pub fn with_occupations(mut self, occupations: Vec<f64>) -> Self {
        self.occupations = Some(occupations);
        self
    }

    pub fn with_irreps(mut self, irreps: Vec<String>) -> Self {
        self.irreps = Some(irreps);
        self
    }

    /// 轨道数（列数）
    pub fn n_orbitals(&self) -> usize {
        self.coefficients.ncols()
    }

    /// AO 数（行数）
    pub fn n_basis(&self) -> usize {
        self.coefficients.nrows()
    }

    /// 第 `i` 个轨道 (0-based) 的系数
    pub fn column(&self, i: usize) -> Vec<f64> {
        self.coefficients.column(i).iter().copied().collect()
    }

    /// 检查平行数组长度
    pub fn validate(&self) -> Result<()> {
        let n = self.n_orbitals();
        let check = |what: &str, len: Option<usize>| match len {
            Some(len) if len != n => Err(CubeViewError::InvalidFormat(format!(
                "{} has {} entries but there are {} orbitals",
                what, len, n
            ))),
            _ => Ok(()),
        };
        check("mo_energy", self.energies.as_ref().map(Vec::len))?;
        check("mo_occ", self.occupations.as_ref().map(Vec::len))?;
        check("irreps", self.irreps.as_ref().map(Vec::len))?;
        Ok(())
    }
}

/// `orbitals.json` 中的一条轨道记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalRecord {
    /// 1-based 轨道编号
    pub index: usize,

    /// 不可约表示及其计数，例如 `"A1.2"`
    pub irrep: String,

    /// `""`, `"a"` 或 `"b"`
    pub spin: String,

    /// 占据数（保留 4 位小数）
    pub occ: f64,

    /// 轨道能量（保留 4 位小数）
    pub energy: f64,

    /// 主要 AO 贡献
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ao_components: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_names() {
        assert_eq!(Spin::Alpha.tag(), "a");
        assert_eq!(Spin::Beta.name(), "beta");
        assert_eq!(Spin::Alpha.to_string(), "alpha");
    }

    #[test]
    fn test_validate_lengths() {
        let set = OrbitalSet::new(DMatrix::identity(3, 3)).with_energies(vec![0.0, 1.0]);
        assert!(set.validate().is_err());

        let set = OrbitalSet::new(DMatrix::identity(3, 3)).with_occupations(vec![2.0, 0.0, 0.0]);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_column_extraction() {
        let coeff = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let set = OrbitalSet::new(coeff);
        assert_eq!(set.column(1), vec![2.0, 4.0]);
    }

    #[test]
    fn test_record_skips_missing_ao_components() {
        let record = OrbitalRecord {
            index: 1,
            irrep: "A.1".to_string(),
            spin: String::new(),
            occ: 2.0,
            energy: -0.5,
            ao_components: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("ao_components"));
    }
}
