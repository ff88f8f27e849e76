//! # JSON 计算结果解析器
//!
//! 读取外部电子结构程序导出的 JSON 结果文件。
//!
//! ## 格式说明
//! ```text
//! {
//!   "method": "rhf",                     // 可选；缺省表示仅分子 + 显式系数
//!   "molecule": {
//!     "name": "ethylene",
//!     "unit": "angstrom",                // 或 "bohr"
//!     "atoms": [{"symbol": "C", "position": [0.0, 0.0, 0.658]}, ...],
//!     "basis": [{"atom": 0, "l": 1, "pure": false,
//!                "exponents": [...], "coefficients": [...]}, ...],
//!     "symmetry": {"group": "D2h",
//!                  "irreps": [{"name": "Ag", "orbitals": [[...], ...]}]},
//!     "overlap": [[...], ...]
//!   },
//!   "mo_coeff": [[...], ...],            // 非限制性: [[[...]], [[...]]]
//!   "mo_energy": [...],                  // 非限制性: [[...], [...]]
//!   "mo_occ": [...],
//!   "irreps": [...]
//! }
//! ```
//!
//! 矩阵按行给出：行 = AO，列 = 轨道。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`

use crate::error::{CubeViewError, Result};
use crate::models::molecule::BOHR_TO_ANGSTROM;
use crate::models::{
    Atom, ComputedResult, Irrep, Molecule, OrbitalPayload, OrbitalSet, PointGroup, Shell,
};
use nalgebra::DMatrix;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawResult {
    method: Option<String>,
    molecule: RawMolecule,
    mo_coeff: Option<RawMatrices>,
    mo_energy: Option<RawVectors<f64>>,
    mo_occ: Option<RawVectors<f64>>,
    irreps: Option<RawVectors<String>>,
}

#[derive(Debug, Deserialize)]
struct RawMolecule {
    name: Option<String>,
    #[serde(default = "default_unit")]
    unit: String,
    atoms: Vec<RawAtom>,
    #[serde(default)]
    basis: Vec<RawShell>,
    symmetry: Option<RawSymmetry>,
    overlap: Option<Vec<Vec<f64>>>,
}

fn default_unit() -> String {
    "angstrom".to_string()
}

#[derive(Debug, Deserialize)]
struct RawAtom {
    symbol: String,
    position: [f64; 3],
}

#[derive(Debug, Deserialize)]
struct RawShell {
    atom: usize,
    l: u32,
    #[serde(default)]
    pure: bool,
    exponents: Vec<f64>,
    coefficients: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSymmetry {
    group: String,
    irreps: Vec<RawIrrep>,
}

#[derive(Debug, Deserialize)]
struct RawIrrep {
    name: String,
    orbitals: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMatrices {
    Single(Vec<Vec<f64>>),
    Pair(Vec<Vec<Vec<f64>>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVectors<T> {
    Single(Vec<T>),
    Pair(Vec<Vec<T>>),
}

/// 解析 JSON 结果文件
pub fn parse_json_result_file(path: &Path) -> Result<ComputedResult> {
    let content = fs::read_to_string(path).map_err(|e| CubeViewError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("molecule");

    parse_json_result_content(&content, name).map_err(|e| match e {
        CubeViewError::InvalidFormat(reason) => CubeViewError::ParseError {
            format: "json".to_string(),
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 从字符串内容解析 JSON 结果
pub fn parse_json_result_content(content: &str, default_name: &str) -> Result<ComputedResult> {
    let raw: RawResult = serde_json::from_str(content)
        .map_err(|e| CubeViewError::InvalidFormat(e.to_string()))?;

    let molecule = build_molecule(raw.molecule, default_name)?;

    let orbitals = match raw.mo_coeff {
        None => None,
        Some(RawMatrices::Single(rows)) => {
            let mut set = OrbitalSet::new(matrix_from_rows(&rows, "mo_coeff")?);
            set.energies = single(raw.mo_energy, "mo_energy")?;
            set.occupations = single(raw.mo_occ, "mo_occ")?;
            set.irreps = single(raw.irreps, "irreps")?;
            set.validate()?;
            Some(OrbitalPayload::Restricted(set))
        }
        Some(RawMatrices::Pair(mats)) => {
            if mats.len() != 2 {
                return Err(CubeViewError::InvalidFormat(format!(
                    "mo_coeff pair must have 2 entries, found {}",
                    mats.len()
                )));
            }
            let [e_a, e_b] = pair(raw.mo_energy, "mo_energy")?;
            let [o_a, o_b] = pair(raw.mo_occ, "mo_occ")?;
            let [i_a, i_b] = pair(raw.irreps, "irreps")?;

            let mut alpha = OrbitalSet::new(matrix_from_rows(&mats[0], "mo_coeff[0]")?);
            alpha.energies = e_a;
            alpha.occupations = o_a;
            alpha.irreps = i_a;
            alpha.validate()?;

            let mut beta = OrbitalSet::new(matrix_from_rows(&mats[1], "mo_coeff[1]")?);
            beta.energies = e_b;
            beta.occupations = o_b;
            beta.irreps = i_b;
            beta.validate()?;

            Some(OrbitalPayload::Unrestricted { alpha, beta })
        }
    };

    Ok(ComputedResult {
        method: raw.method,
        molecule,
        orbitals,
    })
}

fn build_molecule(raw: RawMolecule, default_name: &str) -> Result<Molecule> {
    let scale = match raw.unit.to_lowercase().as_str() {
        "angstrom" | "ang" | "a" => 1.0 / BOHR_TO_ANGSTROM,
        "bohr" | "au" => 1.0,
        other => {
            return Err(CubeViewError::InvalidFormat(format!(
                "Unknown unit '{}'",
                other
            )))
        }
    };

    let atoms = raw
        .atoms
        .iter()
        .map(|a| {
            Atom::new(
                &a.symbol,
                [
                    a.position[0] * scale,
                    a.position[1] * scale,
                    a.position[2] * scale,
                ],
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let basis = raw
        .basis
        .into_iter()
        .map(|s| Shell::new(s.atom, s.l, s.pure, s.exponents, s.coefficients))
        .collect();

    let mut molecule = Molecule::new(raw.name.unwrap_or_else(|| default_name.to_string()), atoms, basis);

    if let Some(sym) = raw.symmetry {
        let irreps = sym
            .irreps
            .iter()
            .map(|ir| {
                Ok(Irrep {
                    name: ir.name.clone(),
                    orbitals: matrix_from_rows(&ir.orbitals, &format!("irrep {}", ir.name))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        molecule.symmetry = Some(PointGroup {
            name: sym.group,
            irreps,
        });
    }

    if let Some(rows) = raw.overlap {
        molecule.overlap = Some(matrix_from_rows(&rows, "overlap")?);
    }

    molecule.validate()?;
    Ok(molecule)
}

/// 行列表 -> 矩阵，要求每行长度一致
fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> Result<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map(Vec::len).unwrap_or(0);

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(CubeViewError::InvalidFormat(format!(
            "{}: row {} has {} columns, expected {}",
            what,
            i,
            row.len(),
            ncols
        )));
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

fn single<T>(raw: Option<RawVectors<T>>, what: &str) -> Result<Option<Vec<T>>> {
    match raw {
        None => Ok(None),
        Some(RawVectors::Single(v)) => Ok(Some(v)),
        Some(RawVectors::Pair(_)) => Err(CubeViewError::InvalidFormat(format!(
            "{} is given per spin but mo_coeff is a single matrix",
            what
        ))),
    }
}

fn pair<T>(raw: Option<RawVectors<T>>, what: &str) -> Result<[Option<Vec<T>>; 2]> {
    match raw {
        None => Ok([None, None]),
        Some(RawVectors::Pair(v)) if v.len() == 2 => {
            let mut it = v.into_iter();
            Ok([it.next(), it.next()])
        }
        Some(_) => Err(CubeViewError::InvalidFormat(format!(
            "{} must be an alpha/beta pair when mo_coeff is a pair",
            what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H2_RHF: &str = r#"{
        "method": "RHF",
        "molecule": {
            "name": "h2",
            "unit": "bohr",
            "atoms": [
                {"symbol": "H", "position": [0.0, 0.0, 0.0]},
                {"symbol": "H", "position": [0.0, 0.0, 1.4]}
            ],
            "basis": [
                {"atom": 0, "l": 0, "exponents": [3.425, 0.624, 0.169], "coefficients": [0.154, 0.535, 0.445]},
                {"atom": 1, "l": 0, "exponents": [3.425, 0.624, 0.169], "coefficients": [0.154, 0.535, 0.445]}
            ]
        },
        "mo_coeff": [[0.5489, 1.2115], [0.5489, -1.2115]],
        "mo_energy": [-0.5782, 0.6703],
        "mo_occ": [2.0, 0.0]
    }"#;

    #[test]
    fn test_parse_restricted() {
        let result = parse_json_result_content(H2_RHF, "fallback").unwrap();

        assert_eq!(result.method.as_deref(), Some("RHF"));
        assert_eq!(result.molecule.name, "h2");
        assert_eq!(result.molecule.nao(), 2);
        assert_eq!(result.molecule.atoms[1].position[2], 1.4);

        match result.orbitals {
            Some(OrbitalPayload::Restricted(set)) => {
                assert_eq!(set.n_orbitals(), 2);
                assert_eq!(set.coefficients[(1, 1)], -1.2115);
                assert_eq!(set.occupations, Some(vec![2.0, 0.0]));
                assert!(set.irreps.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unrestricted() {
        let content = r#"{
            "method": "uhf",
            "molecule": {
                "atoms": [{"symbol": "H", "position": [0.0, 0.0, 0.0]}],
                "basis": [
                    {"atom": 0, "l": 0, "exponents": [1.0], "coefficients": [1.0]},
                    {"atom": 0, "l": 0, "exponents": [0.2], "coefficients": [1.0]}
                ]
            },
            "mo_coeff": [[[1.0, 0.0], [0.0, 1.0]], [[0.0, 1.0], [1.0, 0.0]]],
            "mo_energy": [[-0.5, 0.2], [-0.1, 0.4]]
        }"#;
        let result = parse_json_result_content(content, "h_atom").unwrap();

        assert_eq!(result.molecule.name, "h_atom");
        match result.orbitals {
            Some(OrbitalPayload::Unrestricted { alpha, beta }) => {
                assert_eq!(alpha.energies, Some(vec![-0.5, 0.2]));
                assert_eq!(beta.energies, Some(vec![-0.1, 0.4]));
                assert_eq!(beta.coefficients[(1, 0)], 1.0);
                assert!(alpha.occupations.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_angstrom_is_default_unit() {
        let content = r#"{
            "molecule": {"atoms": [{"symbol": "He", "position": [0.0, 0.0, 1.0]}]}
        }"#;
        let result = parse_json_result_content(content, "he").unwrap();
        let z = result.molecule.atoms[0].position[2];

        assert!((z - 1.0 / BOHR_TO_ANGSTROM).abs() < 1e-10);
        assert!(result.method.is_none());
        assert!(result.orbitals.is_none());
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let content = r#"{
            "molecule": {"atoms": [{"symbol": "H", "position": [0.0, 0.0, 0.0]}]},
            "mo_coeff": [[1.0, 0.0], [1.0]]
        }"#;
        let err = parse_json_result_content(content, "bad").unwrap_err();
        assert!(matches!(err, CubeViewError::InvalidFormat(_)));
    }

    #[test]
    fn test_per_spin_energy_with_single_matrix_rejected() {
        let content = r#"{
            "molecule": {"atoms": [{"symbol": "H", "position": [0.0, 0.0, 0.0]}]},
            "mo_coeff": [[1.0]],
            "mo_energy": [[0.1], [0.2]]
        }"#;
        assert!(parse_json_result_content(content, "bad").is_err());
    }

    #[test]
    fn test_symmetry_block_rows_checked() {
        let content = r#"{
            "molecule": {
                "atoms": [{"symbol": "H", "position": [0.0, 0.0, 0.0]}],
                "basis": [{"atom": 0, "l": 0, "exponents": [1.0], "coefficients": [1.0]}],
                "symmetry": {"group": "C1", "irreps": [{"name": "A", "orbitals": [[1.0], [0.0]]}]}
            }
        }"#;
        assert!(parse_json_result_content(content, "bad").is_err());
    }
}
