//! # inspect 命令实现
//!
//! 打印轨道表（编号、自旋、不可约表示、占据数、能量、AO 成分），
//! 可选写出 CSV。不创建工作目录。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `commands/common.rs`, `cubeview/source.rs`
//! - 使用 `utils/output.rs`

use super::common::load_result;
use crate::cli::inspect::InspectArgs;
use crate::cubeview::OrbitalSource;
use crate::error::{CubeViewError, Result};
use crate::models::OrbitalRecord;
use crate::utils::output;

use std::collections::HashMap;
use std::path::Path;
use tabled::{Table, Tabled};

/// 轨道表行
#[derive(Debug, Clone, Tabled)]
struct OrbitalRow {
    #[tabled(rename = "MO #")]
    index: usize,
    #[tabled(rename = "Spin")]
    spin: String,
    #[tabled(rename = "Irrep")]
    irrep: String,
    #[tabled(rename = "Occ")]
    occ: String,
    #[tabled(rename = "Energy (Eh)")]
    energy: String,
    #[tabled(rename = "AO Components")]
    ao_components: String,
}

impl From<&OrbitalRecord> for OrbitalRow {
    fn from(r: &OrbitalRecord) -> Self {
        OrbitalRow {
            index: r.index,
            spin: if r.spin.is_empty() {
                "a/b".to_string()
            } else {
                r.spin.clone()
            },
            irrep: r.irrep.clone(),
            occ: format!("{:.4}", r.occ),
            energy: format!("{:.4}", r.energy),
            ao_components: r.ao_components.clone().unwrap_or_default(),
        }
    }
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Inspecting orbitals");

    let result = load_result(&args.input, args.format)?;
    let source = OrbitalSource::select(result)?;
    let records = source.orbital_records(args.ao_component)?;

    let shown = limit_per_spin(&records, args.top_n);
    let rows: Vec<OrbitalRow> = shown.iter().map(|r| OrbitalRow::from(*r)).collect();

    output::print_info(&format!(
        "{} view, {} orbital(s)",
        source.kind(),
        records.len()
    ));
    println!("{}", Table::new(&rows));

    if shown.len() < records.len() {
        output::print_skip(&format!(
            "{} more orbital(s) not shown (use --top-n 0 for all)",
            records.len() - shown.len()
        ));
    }

    if let Some(ref path) = args.csv {
        save_records_csv(&records, path)?;
        output::print_success(&format!("Orbital table saved to '{}'", path.display()));
    }

    Ok(())
}

/// 每个自旋通道最多保留 `n` 条，0 表示全部
fn limit_per_spin(records: &[OrbitalRecord], n: usize) -> Vec<&OrbitalRecord> {
    if n == 0 {
        return records.iter().collect();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    records
        .iter()
        .filter(|r| {
            let count = counts.entry(r.spin.as_str()).or_insert(0);
            *count += 1;
            *count <= n
        })
        .collect()
}

/// 保存轨道表到 CSV
fn save_records_csv(records: &[OrbitalRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["index", "spin", "irrep", "occ", "energy", "ao_components"])?;
    for r in records {
        wtr.write_record([
            r.index.to_string(),
            r.spin.clone(),
            r.irrep.clone(),
            format!("{:.4}", r.occ),
            format!("{:.4}", r.energy),
            r.ao_components.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(|e| CubeViewError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, spin: &str) -> OrbitalRecord {
        OrbitalRecord {
            index,
            irrep: format!("A.{}", index),
            spin: spin.to_string(),
            occ: 1.0,
            energy: -0.25,
            ao_components: None,
        }
    }

    #[test]
    fn test_limit_per_spin() {
        let records = vec![
            record(1, "a"),
            record(2, "a"),
            record(3, "a"),
            record(1, "b"),
            record(2, "b"),
        ];
        let shown = limit_per_spin(&records, 2);
        let tags: Vec<(usize, &str)> = shown.iter().map(|r| (r.index, r.spin.as_str())).collect();
        assert_eq!(tags, vec![(1, "a"), (2, "a"), (1, "b"), (2, "b")]);

        assert_eq!(limit_per_spin(&records, 0).len(), 5);
    }

    #[test]
    fn test_row_formatting() {
        let row = OrbitalRow::from(&record(4, ""));
        assert_eq!(row.spin, "a/b");
        assert_eq!(row.energy, "-0.2500");
        assert_eq!(row.ao_components, "");
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orbitals.csv");
        let mut with_ao = record(1, "a");
        with_ao.ao_components = Some("0 H 1s (0.5000), 1 H 1s (0.5000)".to_string());

        save_records_csv(&[with_ao, record(2, "a")], &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][5], "0 H 1s (0.5000), 1 H 1s (0.5000)");
        assert_eq!(&rows[1][2], "A.2");
    }
}
