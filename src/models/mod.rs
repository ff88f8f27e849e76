//! # 数据模型模块
//!
//! 定义分子、AO 基组和分子轨道的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `cubeview/` 使用
//! - 子模块: molecule, basis, orbitals, result

pub mod basis;
pub mod molecule;
pub mod orbitals;
pub mod result;

pub use basis::Shell;
pub use molecule::{Atom, Irrep, Molecule, PointGroup};
pub use orbitals::{OrbitalRecord, OrbitalSet, Spin};
pub use result::{ComputedResult, OrbitalPayload};
