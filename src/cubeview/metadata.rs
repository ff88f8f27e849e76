//! # 轨道元数据构建
//!
//! 将系数矩阵、能量、占据数和对称性标签转换为 `orbitals.json` 记录。
//!
//! - 记录顺序与系数矩阵的列顺序一致（不按能量排序）
//! - 不可约表示按标签分别计数：`A.1`, `A.2`, `B.1`, ...
//! - 缺省值：能量 0，占据数 0，标签 `"A"`
//! - `ao_component > 0` 时附带平方系数最大的若干 AO
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs`, `commands/inspect.rs` 使用
//! - 使用 `models/`

use crate::error::{CubeViewError, Result};
use crate::models::{Molecule, OrbitalRecord, OrbitalSet, Spin};
use std::collections::HashMap;
use std::io::Write;

/// 缺省不可约表示标签
pub const DEFAULT_IRREP: &str = "A";

/// 检查元数据构建的前置条件
pub fn check_preconditions(molecule: &Molecule, set: &OrbitalSet, ao_component: usize) -> Result<()> {
    set.validate()?;
    if ao_component > set.n_orbitals() {
        return Err(CubeViewError::ContractViolation(format!(
            "ao_component ({}) must not exceed the number of orbitals ({})",
            ao_component,
            set.n_orbitals()
        )));
    }
    if set.n_basis() != molecule.nao() {
        return Err(CubeViewError::ContractViolation(format!(
            "MO coefficients have {} rows but the molecule has {} basis functions",
            set.n_basis(),
            molecule.nao()
        )));
    }
    Ok(())
}

/// 构建轨道记录
///
/// `irreps` 为 `None` 时使用 `"A"`；`spin` 为 `None` 时自旋字段为空串。
pub fn build_orbital_records(
    molecule: &Molecule,
    set: &OrbitalSet,
    irreps: Option<&[String]>,
    ao_component: usize,
    spin: Option<Spin>,
) -> Result<Vec<OrbitalRecord>> {
    check_preconditions(molecule, set, ao_component)?;

    let n = set.n_orbitals();
    if let Some(labels) = irreps {
        if labels.len() != n {
            return Err(CubeViewError::InvalidFormat(format!(
                "{} symmetry labels for {} orbitals",
                labels.len(),
                n
            )));
        }
    }

    let ao_labels = if ao_component > 0 {
        molecule.ao_labels()?
    } else {
        Vec::new()
    };

    let mut irrep_counts: HashMap<&str, usize> = HashMap::new();
    let mut records = Vec::with_capacity(n);

    for i in 0..n {
        let energy = set.energies.as_ref().map_or(0.0, |e| e[i]);
        let occ = set.occupations.as_ref().map_or(0.0, |o| o[i]);
        let irrep = irreps.map_or(DEFAULT_IRREP, |labels| labels[i].as_str());

        let count = irrep_counts.entry(irrep).or_insert(0);
        *count += 1;

        let ao_components = if ao_component > 0 {
            Some(top_ao_components(&set.column(i), &ao_labels, ao_component))
        } else {
            None
        };

        records.push(OrbitalRecord {
            index: i + 1,
            irrep: format!("{}.{}", irrep, count),
            spin: spin.map(Spin::tag).unwrap_or("").to_string(),
            occ: round4(occ),
            energy: round4(energy),
            ao_components,
        });
    }

    Ok(records)
}

/// 平方系数最大的 `k` 个 AO，格式 `"0 C 2px (0.4321), 1 H 1s (0.1234)"`
pub fn top_ao_components(coefficients: &[f64], labels: &[String], k: usize) -> String {
    let mut contributions: Vec<(usize, f64)> = coefficients
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, c * c))
        .collect();

    // 稳定排序：相同贡献保持 AO 原始顺序
    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    contributions
        .iter()
        .take(k)
        .map(|&(idx, c2)| {
            let label = labels.get(idx).map(String::as_str).unwrap_or("?");
            format!("{} ({:.4})", label, c2)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 保留 4 位小数
pub fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

/// 以 4 空格缩进写出 `orbitals.json`
pub fn write_records_json<W: Write>(writer: W, records: &[OrbitalRecord]) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    serde::Serialize::serialize(records, &mut ser)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Shell};
    use nalgebra::DMatrix;

    /// 4 个 s 函数的分子，用于构造 4x4 系数矩阵
    fn four_s_molecule() -> Molecule {
        let atoms = vec![
            Atom::new("H", [0.0, 0.0, 0.0]).unwrap(),
            Atom::new("H", [0.0, 0.0, 1.4]).unwrap(),
        ];
        let basis = vec![
            Shell::new(0, 0, false, vec![3.4], vec![1.0]),
            Shell::new(0, 0, false, vec![0.6], vec![1.0]),
            Shell::new(1, 0, false, vec![3.4], vec![1.0]),
            Shell::new(1, 0, false, vec![0.6], vec![1.0]),
        ];
        Molecule::new("h2", atoms, basis)
    }

    fn coefficients() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            4,
            4,
            &[
                0.3, 0.1, 0.9, 0.2, //
                0.5, -0.7, 0.1, 0.2, //
                0.3, 0.1, -0.4, 0.2, //
                0.5, 0.7, 0.1, 0.2,
            ],
        )
    }

    #[test]
    fn test_restricted_defaults() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(coefficients())
            .with_occupations(vec![2.0, 2.0, 0.0, 0.0])
            .with_energies(vec![-1.0, -0.5, 0.1, 0.3]);

        let records = build_orbital_records(&mol, &set, None, 0, None).unwrap();

        assert_eq!(records.len(), 4);
        let irreps: Vec<&str> = records.iter().map(|r| r.irrep.as_str()).collect();
        assert_eq!(irreps, vec!["A.1", "A.2", "A.3", "A.4"]);
        assert!(records.iter().all(|r| r.spin.is_empty()));
        assert!(records.iter().all(|r| r.ao_components.is_none()));
        assert_eq!(
            records.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(records[1].energy, -0.5);
        assert_eq!(records[0].occ, 2.0);
    }

    #[test]
    fn test_missing_energies_default_to_zero() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(coefficients());
        let records = build_orbital_records(&mol, &set, None, 0, Some(Spin::Beta)).unwrap();

        assert!(records.iter().all(|r| r.energy == 0.0 && r.occ == 0.0));
        assert!(records.iter().all(|r| r.spin == "b"));
    }

    #[test]
    fn test_irrep_running_counts() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(coefficients());
        let labels: Vec<String> = ["Ag", "B1u", "Ag", "Ag"].iter().map(|s| s.to_string()).collect();

        let records = build_orbital_records(&mol, &set, Some(&labels), 0, None).unwrap();
        let irreps: Vec<&str> = records.iter().map(|r| r.irrep.as_str()).collect();
        assert_eq!(irreps, vec!["Ag.1", "B1u.1", "Ag.2", "Ag.3"]);
    }

    #[test]
    fn test_ao_components() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(coefficients());

        let records = build_orbital_records(&mol, &set, None, 2, None).unwrap();
        for r in &records {
            let entries = r.ao_components.as_ref().unwrap();
            assert_eq!(entries.split(", ").count(), 2);
        }
        // 第 1 列: 0.09, 0.25, 0.09, 0.25 -> 相同贡献按 AO 顺序
        assert_eq!(
            records[0].ao_components.as_deref(),
            Some("0 H 2s (0.2500), 1 H 2s (0.2500)")
        );
        assert_eq!(
            records[2].ao_components.as_deref(),
            Some("0 H 1s (0.8100), 1 H 1s (0.1600)")
        );
    }

    #[test]
    fn test_ao_component_upper_bound() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(coefficients());

        assert!(build_orbital_records(&mol, &set, None, 4, None).is_ok());
        let err = build_orbital_records(&mol, &set, None, 5, None).unwrap_err();
        assert!(matches!(err, CubeViewError::ContractViolation(_)));
    }

    #[test]
    fn test_basis_size_mismatch() {
        let mol = four_s_molecule();
        let set = OrbitalSet::new(DMatrix::identity(3, 3));
        let err = build_orbital_records(&mol, &set, None, 0, None).unwrap_err();
        assert!(matches!(err, CubeViewError::ContractViolation(_)));
    }

    #[test]
    fn test_short_parallel_arrays_rejected() {
        let mol = four_s_molecule();

        let set = OrbitalSet::new(coefficients()).with_energies(vec![-0.5]);
        let err = build_orbital_records(&mol, &set, None, 0, None).unwrap_err();
        assert!(matches!(err, CubeViewError::InvalidFormat(_)));

        let set = OrbitalSet::new(coefficients()).with_occupations(vec![2.0, 2.0]);
        let err = check_preconditions(&mol, &set, 0).unwrap_err();
        assert!(matches!(err, CubeViewError::InvalidFormat(_)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round4(-0.123456), -0.1235);
        assert_eq!(round4(1.99999), 2.0);
    }

    #[test]
    fn test_json_indentation() {
        let records = vec![OrbitalRecord {
            index: 1,
            irrep: "A.1".to_string(),
            spin: String::new(),
            occ: 2.0,
            energy: -1.0,
            ao_components: None,
        }];
        let mut buf = Vec::new();
        write_records_json(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("[\n    {\n        \"index\": 1,"));
        let parsed: Vec<OrbitalRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records);
    }
}
