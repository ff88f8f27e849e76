//! # Molden 格式解析器
//!
//! 解析 Molcas/OpenMolcas、ORCA、PySCF 等程序写出的 Molden 文件。
//!
//! ## 格式说明
//! ```text
//! [Molden Format]
//! [Atoms] AU                      (或 Angs)
//! C     1    6     0.000   0.000   1.243
//! ...
//! [GTO]
//!   1 0
//!  s    3 1.00
//!   172.256   0.0617669
//!   ...
//!                                  (空行结束一个原子)
//! [5D]                            ([5D7F], [5D10F], [7F], [9G])
//! [MO]
//!  Sym= Ag
//!  Ene= -11.2345
//!  Spin= Alpha
//!  Occup= 2.000000
//!    1   0.99123
//!    ...
//! ```
//!
//! 每个自旋通道内部按能量稳定排序。只有 Alpha 轨道时视为显式轨道 (custom)，
//! 含 Beta 轨道时视为非限制性结果。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`

use crate::error::{CubeViewError, Result};
use crate::models::basis::letter_to_l;
use crate::models::molecule::BOHR_TO_ANGSTROM;
use crate::models::{Atom, ComputedResult, Molecule, OrbitalPayload, OrbitalSet, Shell};
use nalgebra::DMatrix;
use regex::Regex;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// 一个 [MO] 块
#[derive(Debug, Clone, Default)]
struct MoldenOrbital {
    sym: Option<String>,
    energy: f64,
    occupation: f64,
    beta: bool,
    coefficients: Vec<(usize, f64)>,
}

/// 壳层分量约定
#[derive(Debug, Clone, Copy, Default)]
struct PureFlags {
    d: bool,
    f: bool,
    g: bool,
}

/// 解析 Molden 文件
pub fn parse_molden_file(path: &Path) -> Result<ComputedResult> {
    let content = fs::read_to_string(path).map_err(|e| CubeViewError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .and_then(|s| s.split('.').next())
        .unwrap_or("molden");

    parse_molden_content(&content, name).map_err(|e| match e {
        CubeViewError::InvalidFormat(reason) => CubeViewError::ParseError {
            format: "molden".to_string(),
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 从字符串内容解析 Molden 格式
pub fn parse_molden_content(content: &str, default_name: &str) -> Result<ComputedResult> {
    let header = Regex::new(r"^\s*\[([^\]]+)\]\s*(.*)$").expect("valid section regex");

    let mut title: Option<String> = None;
    let mut atoms: Vec<Atom> = Vec::new();
    let mut atom_ids: Vec<usize> = Vec::new();
    let mut gto_lines: Vec<&str> = Vec::new();
    let mut mo_lines: Vec<&str> = Vec::new();
    let mut flags = PureFlags::default();

    let mut section = String::new();
    let mut atoms_in_bohr = false;

    for line in content.lines() {
        if let Some(caps) = header.captures(line) {
            section = caps[1].trim().to_lowercase();
            let arg = caps[2].trim().to_lowercase();
            match section.as_str() {
                "atoms" => atoms_in_bohr = arg.starts_with("au") || arg.starts_with("bohr"),
                "5d" | "5d7f" => {
                    flags.d = true;
                    flags.f = true;
                }
                "5d10f" => flags.d = true,
                "7f" => flags.f = true,
                "9g" => flags.g = true,
                _ => {}
            }
            continue;
        }

        match section.as_str() {
            "title" if title.is_none() && !line.trim().is_empty() => {
                title = Some(line.trim().to_string());
            }
            "atoms" => {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 6 {
                    continue;
                }
                let (atom, id) = parse_atom_line(&parts, atoms_in_bohr)?;
                atoms.push(atom);
                atom_ids.push(id);
            }
            "gto" => gto_lines.push(line),
            "mo" => mo_lines.push(line),
            _ => {}
        }
    }

    if atoms.is_empty() {
        return Err(CubeViewError::InvalidFormat(
            "Missing or empty [Atoms] section".to_string(),
        ));
    }

    let basis = parse_gto_section(&gto_lines, &atom_ids, flags)?;
    let name = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| default_name.to_string());
    let molecule = Molecule::new(name, atoms, basis);
    molecule.validate()?;

    let orbitals = parse_mo_section(&mo_lines)?;
    if orbitals.is_empty() {
        return Ok(ComputedResult::from_molecule(molecule, None));
    }

    let nao = molecule.nao();
    let (mut beta, mut alpha): (Vec<_>, Vec<_>) = orbitals.into_iter().partition(|o| o.beta);
    sort_by_energy(&mut alpha);
    sort_by_energy(&mut beta);

    if beta.is_empty() {
        let set = build_orbital_set(&alpha, nao)?;
        Ok(ComputedResult::from_molecule(molecule, Some(set)))
    } else {
        let alpha = build_orbital_set(&alpha, nao)?;
        let beta = build_orbital_set(&beta, nao)?;
        Ok(ComputedResult::from_method(
            "uhf",
            molecule,
            OrbitalPayload::Unrestricted { alpha, beta },
        ))
    }
}

/// 解析 [Atoms] 中的一行: `label index Z x y z`
fn parse_atom_line(parts: &[&str], in_bohr: bool) -> Result<(Atom, usize)> {
    let bad = |what: &str| CubeViewError::InvalidFormat(format!("Bad {} in atom line: {}", what, parts.join(" ")));

    let id: usize = parts[1].parse().map_err(|_| bad("index"))?;
    let z: u32 = parts[2].parse().map_err(|_| bad("atomic number"))?;

    let mut pos = [0.0; 3];
    for k in 0..3 {
        pos[k] = parse_float(parts[3 + k]).ok_or_else(|| bad("coordinate"))?;
        if !in_bohr {
            pos[k] /= BOHR_TO_ANGSTROM;
        }
    }

    // 优先使用原子序数；标签可能带编号（如 C1）
    let symbol = crate::models::molecule::element_symbol(z)
        .map(str::to_string)
        .unwrap_or_else(|| {
            parts[0]
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .to_string()
        });

    Ok((Atom::new(&symbol, pos)?, id))
}

/// 解析 [GTO] 块
fn parse_gto_section(lines: &[&str], atom_ids: &[usize], flags: PureFlags) -> Result<Vec<Shell>> {
    let mut shells = Vec::new();
    let mut current_atom: Option<usize> = None;
    let mut i = 0;

    while i < lines.len() {
        let parts: Vec<&str> = lines[i].split_whitespace().collect();
        i += 1;

        if parts.is_empty() {
            current_atom = None;
            continue;
        }

        // 原子头: "<atom_id> 0"，部分程序省略原子之间的空行
        if current_atom.is_none() || parts[0].parse::<usize>().is_ok() {
            let id: usize = parts[0].parse().map_err(|_| {
                CubeViewError::InvalidFormat(format!("Expected atom number in [GTO], found '{}'", parts[0]))
            })?;
            let atom = atom_ids.iter().position(|&a| a == id).ok_or_else(|| {
                CubeViewError::InvalidFormat(format!("[GTO] refers to unknown atom {}", id))
            })?;
            current_atom = Some(atom);
            continue;
        }

        // 壳层头: "<type> <nprim> [scale]"
        let Some(atom) = current_atom else {
            continue;
        };
        let kind = parts[0].to_lowercase();
        let nprim: usize = parts
            .get(1)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CubeViewError::InvalidFormat(format!("Bad shell header: {}", parts.join(" "))))?;
        let scale = parts.get(2).and_then(|s| parse_float(s)).unwrap_or(1.0);
        let scale = if scale == 0.0 { 1.0 } else { scale };

        let mut exponents = Vec::with_capacity(nprim);
        let mut c1 = Vec::with_capacity(nprim);
        let mut c2 = Vec::with_capacity(nprim);
        for _ in 0..nprim {
            let prim = lines.get(i).ok_or_else(|| {
                CubeViewError::InvalidFormat("Unexpected end of [GTO] section".to_string())
            })?;
            i += 1;
            let values: Vec<f64> = prim.split_whitespace().filter_map(parse_float).collect();
            if values.len() < 2 {
                return Err(CubeViewError::InvalidFormat(format!(
                    "Bad primitive line: {}",
                    prim.trim()
                )));
            }
            exponents.push(values[0] * scale * scale);
            c1.push(values[1]);
            c2.push(values.get(2).copied().unwrap_or(0.0));
        }

        if kind == "sp" {
            shells.push(Shell::new(atom, 0, false, exponents.clone(), c1));
            shells.push(Shell::new(atom, 1, false, exponents, c2));
            continue;
        }

        let l = letter_to_l(&kind).ok_or_else(|| {
            CubeViewError::UnsupportedFormat(format!("Molden shell type '{}'", kind))
        })?;
        let pure = match l {
            2 => flags.d,
            3 => flags.f,
            4 => flags.g,
            _ => false,
        };
        shells.push(Shell::new(atom, l, pure, exponents, c1));
    }

    Ok(shells)
}

/// 解析 [MO] 块
fn parse_mo_section(lines: &[&str]) -> Result<Vec<MoldenOrbital>> {
    let mut orbitals: Vec<MoldenOrbital> = Vec::new();
    let mut current: Option<MoldenOrbital> = None;
    let mut in_coefficients = false;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            // 关键字行出现在系数之后，说明开始了新的轨道
            if in_coefficients {
                if let Some(done) = current.take() {
                    orbitals.push(done);
                }
                in_coefficients = false;
            }
            let mo = current.get_or_insert_with(MoldenOrbital::default);
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "sym" => mo.sym = Some(value.to_string()),
                "ene" => {
                    mo.energy = parse_float(value).ok_or_else(|| {
                        CubeViewError::InvalidFormat(format!("Bad energy: {}", value))
                    })?
                }
                "spin" => mo.beta = value.eq_ignore_ascii_case("beta"),
                "occup" => {
                    mo.occupation = parse_float(value).ok_or_else(|| {
                        CubeViewError::InvalidFormat(format!("Bad occupation: {}", value))
                    })?
                }
                _ => {}
            }
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(CubeViewError::InvalidFormat(format!(
                "Bad MO coefficient line: {}",
                trimmed
            )));
        }
        let idx: usize = parts[0]
            .parse()
            .map_err(|_| CubeViewError::InvalidFormat(format!("Bad AO index: {}", parts[0])))?;
        let value = parse_float(parts[1])
            .ok_or_else(|| CubeViewError::InvalidFormat(format!("Bad coefficient: {}", parts[1])))?;

        current
            .get_or_insert_with(MoldenOrbital::default)
            .coefficients
            .push((idx, value));
        in_coefficients = true;
    }

    if let Some(done) = current {
        orbitals.push(done);
    }
    Ok(orbitals)
}

fn sort_by_energy(orbitals: &mut [MoldenOrbital]) {
    orbitals.sort_by(|a, b| a.energy.partial_cmp(&b.energy).unwrap_or(Ordering::Equal));
}

/// 组装系数矩阵；未列出的 AO 系数为 0
fn build_orbital_set(orbitals: &[MoldenOrbital], nao: usize) -> Result<OrbitalSet> {
    let mut coeff = DMatrix::zeros(nao, orbitals.len());
    for (j, mo) in orbitals.iter().enumerate() {
        for &(idx, value) in &mo.coefficients {
            if idx == 0 || idx > nao {
                return Err(CubeViewError::InvalidFormat(format!(
                    "MO coefficient index {} outside basis of size {}",
                    idx, nao
                )));
            }
            coeff[(idx - 1, j)] = value;
        }
    }

    let mut set = OrbitalSet::new(coeff)
        .with_energies(orbitals.iter().map(|o| o.energy).collect())
        .with_occupations(orbitals.iter().map(|o| o.occupation).collect());

    if orbitals.iter().any(|o| o.sym.is_some()) {
        set = set.with_irreps(
            orbitals
                .iter()
                .map(|o| o.sym.clone().unwrap_or_else(|| "A".to_string()))
                .collect(),
        );
    }
    Ok(set)
}

/// 支持 Fortran 风格的 `D` 指数
fn parse_float(s: &str) -> Option<f64> {
    s.replace(['D', 'd'], "E").parse().ok()
}
