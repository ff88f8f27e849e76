//! # Cube 文件生成
//!
//! 对单个轨道在网格上求值，写出 Gaussian cube 格式，再压缩为 `.cube.gz`。
//!
//! ## Cube 格式
//! ```text
//! 注释行 1
//! 注释行 2
//! natm  ox oy oz
//! nx    dx 0  0
//! ny    0  dy 0
//! nz    0  0  dz
//! Z  0.0  x y z        (每个原子一行)
//! 数据: 对每个 (ix, iy)，nz 个值，每行 6 个
//! ```
//!
//! 未压缩的 cube 先写入每次调用独立的临时文件，压缩完成后删除，
//! 因此多个 cube 可以同时生成。
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs` 使用
//! - 使用 `cubeview/grid.rs`
//! - 使用 `flate2`, `tempfile`

use super::grid::{CubeGrid, GaussianBasis};
use crate::error::{CubeViewError, Result};
use crate::models::Molecule;

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 默认网格分辨率 (Bohr)
pub const DEFAULT_RESOLUTION: f64 = 0.3;

/// 默认边距 (Bohr)
pub const DEFAULT_MARGIN: f64 = 5.0;

/// 写出 cube 文本
pub fn write_cube<W: Write>(
    writer: &mut W,
    molecule: &Molecule,
    grid: &CubeGrid,
    values: &[f64],
    comment: &str,
) -> io::Result<()> {
    writeln!(writer, "{}", comment)?;
    writeln!(writer, "Generated by cubeview {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        writer,
        "{:5}{:14.8}{:14.8}{:14.8}",
        molecule.atoms.len(),
        grid.origin[0],
        grid.origin[1],
        grid.origin[2]
    )?;
    for k in 0..3 {
        let mut axis = [0.0; 3];
        axis[k] = grid.steps[k];
        writeln!(
            writer,
            "{:5}{:14.8}{:14.8}{:14.8}",
            grid.counts[k], axis[0], axis[1], axis[2]
        )?;
    }
    for atom in &molecule.atoms {
        writeln!(
            writer,
            "{:5}{:14.8}{:14.8}{:14.8}{:14.8}",
            atom.atomic_number, 0.0, atom.position[0], atom.position[1], atom.position[2]
        )?;
    }

    let nz = grid.counts[2];
    for row in values.chunks(nz) {
        for line in row.chunks(6) {
            for v in line {
                write!(writer, " {:>12}", format_value(*v))?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// `%13.5E` 风格：指数部分至少两位
fn format_value(v: f64) -> String {
    let s = format!("{:.5E}", v);
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}E{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

/// Cube 文件生成器
#[derive(Debug, Clone, Copy)]
pub struct CubeGenerator {
    /// 网格分辨率 (Bohr)
    pub resolution: f64,

    /// 分子包围盒外的边距 (Bohr)
    pub margin: f64,
}

impl Default for CubeGenerator {
    fn default() -> Self {
        CubeGenerator {
            resolution: DEFAULT_RESOLUTION,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl CubeGenerator {
    pub fn new(resolution: f64, margin: f64) -> Self {
        CubeGenerator { resolution, margin }
    }

    /// 生成单个轨道的 `.cube.gz`
    pub fn generate(
        &self,
        molecule: &Molecule,
        basis: &GaussianBasis,
        coefficients: &[f64],
        output: &Path,
    ) -> Result<()> {
        let grid = CubeGrid::around(molecule, self.resolution, self.margin)?;
        let values = basis.evaluate_orbital(coefficients, &grid)?;

        let scratch = NamedTempFile::new().map_err(|e| CubeViewError::FileWriteError {
            path: std::env::temp_dir().display().to_string(),
            source: e,
        })?;
        let scratch_path = scratch.path().display().to_string();
        let write_err = |e: io::Error| CubeViewError::FileWriteError {
            path: scratch_path.clone(),
            source: e,
        };

        {
            let mut writer = BufWriter::new(scratch.as_file());
            write_cube(
                &mut writer,
                molecule,
                &grid,
                &values,
                "Orbital value in real space (1/Bohr^3)",
            )
            .map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }

        compress_file(scratch.path(), output)?;

        scratch.close().map_err(|e| CubeViewError::FileWriteError {
            path: scratch_path.clone(),
            source: e,
        })
    }
}

/// gzip 压缩 `input` 到 `output`
pub fn compress_file(input: &Path, output: &Path) -> Result<()> {
    let mut src = File::open(input).map_err(|e| CubeViewError::FileReadError {
        path: input.display().to_string(),
        source: e,
    })?;
    let write_err = |e: io::Error| CubeViewError::FileWriteError {
        path: output.display().to_string(),
        source: e,
    };

    let dst = File::create(output).map_err(write_err)?;
    let mut encoder = GzEncoder::new(BufWriter::new(dst), Compression::default());
    io::copy(&mut src, &mut encoder).map_err(write_err)?;
    encoder
        .finish()
        .map_err(write_err)?
        .flush()
        .map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Shell};
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn h2() -> Molecule {
        let atoms = vec![
            Atom::new("H", [0.0, 0.0, 0.0]).unwrap(),
            Atom::new("H", [0.0, 0.0, 1.4]).unwrap(),
        ];
        let basis = vec![
            Shell::new(0, 0, false, vec![3.425, 0.624, 0.169], vec![0.154, 0.535, 0.445]),
            Shell::new(1, 0, false, vec![3.425, 0.624, 0.169], vec![0.154, 0.535, 0.445]),
        ];
        Molecule::new("h2", atoms, basis)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0.00000E+00");
        assert_eq!(format_value(-0.00123456), "-1.23456E-03");
        assert_eq!(format_value(12345.0), "1.23450E+04");
    }

    #[test]
    fn test_cube_header_and_layout() {
        let mol = h2();
        let grid = CubeGrid::around(&mol, 1.0, 2.0).unwrap();
        let basis = GaussianBasis::new(&mol).unwrap();
        let values = basis.evaluate_orbital(&[0.5489, 0.5489], &grid).unwrap();

        let mut buf = Vec::new();
        write_cube(&mut buf, &mol, &grid, &values, "test").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "test");
        let natm: usize = lines[2].split_whitespace().next().unwrap().parse().unwrap();
        assert_eq!(natm, 2);
        let nx: usize = lines[3].split_whitespace().next().unwrap().parse().unwrap();
        assert_eq!(nx, grid.counts[0]);
        assert!(lines[6].trim_start().starts_with("1 "));

        let [nx, ny, nz] = grid.counts;
        let data_lines = nx * ny * ((nz + 5) / 6);
        assert_eq!(lines.len(), 6 + 2 + data_lines);

        let numbers: Vec<f64> = lines[8..]
            .iter()
            .flat_map(|l| l.split_whitespace())
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(numbers.len(), grid.n_points());
    }

    #[test]
    fn test_generate_gz_roundtrip() {
        let mol = h2();
        let basis = GaussianBasis::new(&mol).unwrap();
        let generator = CubeGenerator::new(0.8, 2.0);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("1.cube.gz");

        generator
            .generate(&mol, &basis, &[0.5489, 0.5489], &out)
            .unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&out).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();

        let grid = CubeGrid::around(&mol, 0.8, 2.0).unwrap();
        let values = basis.evaluate_orbital(&[0.5489, 0.5489], &grid).unwrap();
        let mut expected = Vec::new();
        write_cube(
            &mut expected,
            &mol,
            &grid,
            &values,
            "Orbital value in real space (1/Bohr^3)",
        )
        .unwrap();

        assert_eq!(decoded.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_generate_propagates_basis_mismatch() {
        let mol = h2();
        let basis = GaussianBasis::new(&mol).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bad.cube.gz");

        let err = CubeGenerator::default()
            .generate(&mol, &basis, &[1.0], &out)
            .unwrap_err();
        assert!(matches!(err, CubeViewError::ContractViolation(_)));
        assert!(!out.exists());
    }
}
