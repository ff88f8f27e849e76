//! # 视图策略选择
//!
//! 根据计算结果的方法标记，一次性解析为封闭的 `OrbitalSource` 变体：
//!
//! | 输入                         | 变体               |
//! |------------------------------|--------------------|
//! | 仅分子 + 显式系数            | `Custom`           |
//! | `uhf`, `uks`                 | `Unrestricted`     |
//! | `rhf`, `rks`, `rohf`, `roks` | `Restricted`       |
//! | `casscf`                     | `NaturalOrbitals`  |
//! | 其他                         | `UnsupportedMethod`|
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs`, `commands/` 使用
//! - 使用 `models/`, `cubeview/metadata.rs`, `cubeview/symmetry.rs`

use super::metadata::{build_orbital_records, check_preconditions};
use super::symmetry::label_orbital_symmetry;
use crate::error::{CubeViewError, Result};
use crate::models::{ComputedResult, Molecule, OrbitalPayload, OrbitalRecord, OrbitalSet, Spin};

/// 方法族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFamily {
    Restricted,
    Unrestricted,
    NaturalOrbitals,
}

impl MethodFamily {
    /// 由方法名识别方法族（不区分大小写）
    pub fn from_method(method: &str) -> Option<Self> {
        match method.trim().to_lowercase().as_str() {
            "rhf" | "rks" | "rohf" | "roks" => Some(MethodFamily::Restricted),
            "uhf" | "uks" => Some(MethodFamily::Unrestricted),
            "casscf" => Some(MethodFamily::NaturalOrbitals),
            _ => None,
        }
    }
}

/// 轨道来源
#[derive(Debug, Clone)]
pub enum OrbitalSource {
    /// 闭壳层 / 限制性开壳层
    Restricted {
        molecule: Molecule,
        orbitals: OrbitalSet,
    },

    /// 多组态自然轨道，行为与 `Restricted` 相同
    NaturalOrbitals {
        molecule: Molecule,
        orbitals: OrbitalSet,
    },

    /// 非限制性，alpha / beta 各一组
    Unrestricted {
        molecule: Molecule,
        alpha: OrbitalSet,
        beta: OrbitalSet,
    },

    /// 用户直接给出的系数
    Custom {
        molecule: Molecule,
        orbitals: OrbitalSet,
    },
}

impl OrbitalSource {
    /// 选择视图策略
    pub fn select(result: ComputedResult) -> Result<Self> {
        let ComputedResult {
            method,
            molecule,
            orbitals,
        } = result;

        let Some(method) = method else {
            return match orbitals {
                Some(OrbitalPayload::Restricted(orbitals)) => {
                    Ok(OrbitalSource::Custom { molecule, orbitals })
                }
                Some(other) => Err(CubeViewError::InvalidFormat(format!(
                    "Custom orbitals must be a single coefficient matrix, got {}",
                    other.shape_name()
                ))),
                None => Err(CubeViewError::ContractViolation(
                    "MO coefficients must be provided for a custom view".to_string(),
                )),
            };
        };

        let family = MethodFamily::from_method(&method)
            .ok_or_else(|| CubeViewError::UnsupportedMethod(method.clone()))?;

        let orbitals = orbitals.ok_or_else(|| {
            CubeViewError::InvalidFormat(format!("Result of method '{}' carries no MO coefficients", method))
        })?;

        match (family, orbitals) {
            (MethodFamily::Restricted, OrbitalPayload::Restricted(orbitals)) => {
                Ok(OrbitalSource::Restricted { molecule, orbitals })
            }
            (MethodFamily::NaturalOrbitals, OrbitalPayload::Restricted(orbitals)) => {
                Ok(OrbitalSource::NaturalOrbitals { molecule, orbitals })
            }
            (MethodFamily::Unrestricted, OrbitalPayload::Unrestricted { alpha, beta }) => {
                Ok(OrbitalSource::Unrestricted {
                    molecule,
                    alpha,
                    beta,
                })
            }
            (_, payload) => Err(CubeViewError::InvalidFormat(format!(
                "Method '{}' does not match {}",
                method,
                payload.shape_name()
            ))),
        }
    }

    /// 变体名称
    pub fn kind(&self) -> &'static str {
        match self {
            OrbitalSource::Restricted { .. } => "restricted",
            OrbitalSource::NaturalOrbitals { .. } => "natural orbitals",
            OrbitalSource::Unrestricted { .. } => "unrestricted",
            OrbitalSource::Custom { .. } => "custom",
        }
    }

    pub fn molecule(&self) -> &Molecule {
        match self {
            OrbitalSource::Restricted { molecule, .. }
            | OrbitalSource::NaturalOrbitals { molecule, .. }
            | OrbitalSource::Unrestricted { molecule, .. }
            | OrbitalSource::Custom { molecule, .. } => molecule,
        }
    }

    /// 各自旋通道的轨道；限制性结果只有一个通道，自旋为 `None`
    pub fn channels(&self) -> Vec<(Option<Spin>, &OrbitalSet)> {
        match self {
            OrbitalSource::Restricted { orbitals, .. }
            | OrbitalSource::NaturalOrbitals { orbitals, .. }
            | OrbitalSource::Custom { orbitals, .. } => vec![(None, orbitals)],
            OrbitalSource::Unrestricted { alpha, beta, .. } => {
                vec![(Some(Spin::Alpha), alpha), (Some(Spin::Beta), beta)]
            }
        }
    }

    /// 对称性标签
    ///
    /// 求解器结果在分子声明点群时做投影标记，否则沿用读入的标签；
    /// `Custom` 只使用调用方给出的标签。
    pub fn symmetry_labels(&self, orbitals: &OrbitalSet) -> Result<Option<Vec<String>>> {
        let molecule = self.molecule();
        match (self, &molecule.symmetry) {
            (OrbitalSource::Custom { .. }, _) | (_, None) => Ok(orbitals.irreps.clone()),
            (_, Some(group)) => label_orbital_symmetry(
                group,
                molecule.overlap.as_ref(),
                &orbitals.coefficients,
            )
            .map(Some),
        }
    }

    /// 检查所有通道的前置条件
    pub fn check_preconditions(&self, ao_component: usize) -> Result<()> {
        for (_, set) in self.channels() {
            check_preconditions(self.molecule(), set, ao_component)?;
        }
        Ok(())
    }

    /// 所有通道的轨道记录，alpha 在前
    pub fn orbital_records(&self, ao_component: usize) -> Result<Vec<OrbitalRecord>> {
        self.check_preconditions(ao_component)?;

        let mut records = Vec::new();
        for (spin, set) in self.channels() {
            let labels = self.symmetry_labels(set)?;
            records.extend(build_orbital_records(
                self.molecule(),
                set,
                labels.as_deref(),
                ao_component,
                spin,
            )?);
        }
        Ok(records)
    }
}
