//! # 分子数据模型
//!
//! 存储外部电子结构程序给出的分子信息：原子、几何、AO 基组以及可选的点群数据。
//! 本模块只读，不做任何电子结构计算。
//!
//! ## 单位
//! 内部坐标统一使用 Bohr，`mol.xyz` 输出时转换为 Å。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `cubeview/` 使用
//! - 使用 `models/basis.rs`

use super::basis::Shell;
use crate::error::{CubeViewError, Result};
use nalgebra::DMatrix;
use std::collections::HashMap;

/// 1 Bohr 对应的 Å
pub const BOHR_TO_ANGSTROM: f64 = 0.529_177_210_92;

const ELEMENTS: [&str; 86] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn",
];

/// 元素符号 -> 原子序数（不区分大小写）
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ELEMENTS
        .iter()
        .position(|el| el.eq_ignore_ascii_case(symbol))
        .map(|i| i as u32 + 1)
}

/// 原子序数 -> 元素符号
pub fn element_symbol(z: u32) -> Option<&'static str> {
    if z == 0 {
        return None;
    }
    ELEMENTS.get(z as usize - 1).copied()
}

/// 原子信息
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 元素符号
    pub symbol: String,

    /// 原子序数
    pub atomic_number: u32,

    /// 笛卡尔坐标 (Bohr)
    pub position: [f64; 3],
}

impl Atom {
    /// 由元素符号创建，未知元素报错
    pub fn new(symbol: &str, position: [f64; 3]) -> Result<Self> {
        let z = atomic_number(symbol)
            .ok_or_else(|| CubeViewError::InvalidFormat(format!("Unknown element '{}'", symbol)))?;
        Ok(Atom {
            symbol: element_symbol(z).unwrap_or(symbol).to_string(),
            atomic_number: z,
            position,
        })
    }
}

/// 单个不可约表示及其对称匹配 AO 组合 (nao x n_i)
#[derive(Debug, Clone)]
pub struct Irrep {
    pub name: String,
    pub orbitals: DMatrix<f64>,
}

/// 点群信息
#[derive(Debug, Clone)]
pub struct PointGroup {
    pub name: String,
    pub irreps: Vec<Irrep>,
}

/// 分子
#[derive(Debug, Clone)]
pub struct Molecule {
    /// 名称（通常取输入文件名）
    pub name: String,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// AO 基组壳层，顺序即 AO 顺序
    pub basis: Vec<Shell>,

    /// 声明的点群；`None` 表示不使用对称性
    pub symmetry: Option<PointGroup>,

    /// AO 重叠矩阵（可选，用于对称性标记）
    pub overlap: Option<DMatrix<f64>>,
}

impl Molecule {
    pub fn new(name: impl Into<String>, atoms: Vec<Atom>, basis: Vec<Shell>) -> Self {
        Molecule {
            name: name.into(),
            atoms,
            basis,
            symmetry: None,
            overlap: None,
        }
    }

    /// AO 基函数总数
    pub fn nao(&self) -> usize {
        self.basis.iter().map(Shell::n_components).sum()
    }

    /// 检查壳层与原子的对应关系、点群与重叠矩阵的维度
    pub fn validate(&self) -> Result<()> {
        if self.atoms.is_empty() {
            return Err(CubeViewError::InvalidFormat(format!(
                "Molecule '{}' has no atoms",
                self.name
            )));
        }
        for (i, shell) in self.basis.iter().enumerate() {
            if shell.atom >= self.atoms.len() {
                return Err(CubeViewError::InvalidFormat(format!(
                    "Shell {} refers to atom {} but the molecule has {} atoms",
                    i,
                    shell.atom,
                    self.atoms.len()
                )));
            }
            shell.validate()?;
        }

        let nao = self.nao();
        if let Some(ref s) = self.overlap {
            if s.nrows() != nao || s.ncols() != nao {
                return Err(CubeViewError::InvalidFormat(format!(
                    "Overlap matrix is {}x{} but the basis has {} functions",
                    s.nrows(),
                    s.ncols(),
                    nao
                )));
            }
        }
        if let Some(ref group) = self.symmetry {
            for irrep in &group.irreps {
                if irrep.orbitals.nrows() != nao {
                    return Err(CubeViewError::InvalidFormat(format!(
                        "Irrep {} of {} has {} rows, expected {}",
                        irrep.name,
                        group.name,
                        irrep.orbitals.nrows(),
                        nao
                    )));
                }
            }
        }
        Ok(())
    }

    /// AO 标签，例如 `"0 C 2px"`
    ///
    /// 壳层编号按 (原子, l) 计数，从 `l + 1` 开始。
    pub fn ao_labels(&self) -> Result<Vec<String>> {
        let mut shell_counts: HashMap<(usize, u32), u32> = HashMap::new();
        let mut labels = Vec::with_capacity(self.nao());

        for shell in &self.basis {
            let count = shell_counts.entry((shell.atom, shell.l)).or_insert(0);
            let n = shell.l + 1 + *count;
            *count += 1;

            let symbol = self
                .atoms
                .get(shell.atom)
                .map(|a| a.symbol.as_str())
                .unwrap_or("X");
            for component in shell.component_names()? {
                labels.push(format!("{} {} {}{}", shell.atom, symbol, n, component));
            }
        }

        Ok(labels)
    }

    /// 原子坐标包围盒 (Bohr)
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for atom in &self.atoms {
            for k in 0..3 {
                lo[k] = lo[k].min(atom.position[k]);
                hi[k] = hi[k].max(atom.position[k]);
            }
        }
        (lo, hi)
    }

    /// 转换为 XYZ 格式（Å）
    pub fn to_xyz_string(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}\n", self.atoms.len()));
        result.push_str(&format!("{}\n", self.name));

        for atom in &self.atoms {
            result.push_str(&format!(
                "{:<2} {:16.10} {:16.10} {:16.10}\n",
                atom.symbol,
                atom.position[0] * BOHR_TO_ANGSTROM,
                atom.position[1] * BOHR_TO_ANGSTROM,
                atom.position[2] * BOHR_TO_ANGSTROM
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.0]).unwrap(),
            Atom::new("H", [0.0, 1.43, 1.11]).unwrap(),
            Atom::new("H", [0.0, -1.43, 1.11]).unwrap(),
        ];
        let basis = vec![
            Shell::new(0, 0, false, vec![130.7, 23.8, 6.44], vec![0.154, 0.535, 0.445]),
            Shell::new(0, 0, false, vec![5.03, 1.17, 0.38], vec![-0.1, 0.4, 0.7]),
            Shell::new(0, 1, false, vec![5.03, 1.17, 0.38], vec![0.156, 0.608, 0.392]),
            Shell::new(1, 0, false, vec![3.43, 0.62, 0.17], vec![0.154, 0.535, 0.445]),
            Shell::new(2, 0, false, vec![3.43, 0.62, 0.17], vec![0.154, 0.535, 0.445]),
        ];
        Molecule::new("water", atoms, basis)
    }

    #[test]
    fn test_element_lookup() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("cl"), Some(17));
        assert_eq!(element_symbol(8), Some("O"));
        assert_eq!(element_symbol(0), None);
        assert!(Atom::new("Xx", [0.0; 3]).is_err());
    }

    #[test]
    fn test_nao_and_labels() {
        let mol = water();
        assert_eq!(mol.nao(), 7);

        let labels = mol.ao_labels().unwrap();
        assert_eq!(
            labels,
            vec!["0 O 1s", "0 O 2s", "0 O 2px", "0 O 2py", "0 O 2pz", "1 H 1s", "2 H 1s"]
        );
    }

    #[test]
    fn test_validate_rejects_bad_shell_atom() {
        let mut mol = water();
        mol.basis
            .push(Shell::new(7, 0, false, vec![1.0], vec![1.0]));
        assert!(mol.validate().is_err());
    }

    #[test]
    fn test_xyz_in_angstrom() {
        let mol = water();
        let xyz = mol.to_xyz_string();
        let lines: Vec<&str> = xyz.lines().collect();

        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "water");
        let y: f64 = lines[2 + 1].split_whitespace().nth(2).unwrap().parse().unwrap();
        assert!((y - 1.43 * BOHR_TO_ANGSTROM).abs() < 1e-8);
    }

    #[test]
    fn test_bounding_box() {
        let (lo, hi) = water().bounding_box();
        assert_eq!(lo, [0.0, -1.43, 0.0]);
        assert_eq!(hi, [0.0, 1.43, 1.11]);
    }
}
