//! # AO 基组壳层
//!
//! 描述收缩高斯壳层及其分量顺序。分量顺序与 Molden 约定一致：
//!
//! ```text
//! p  : x y z
//! 6d : xx yy zz xy xz yz
//! 10f: xxx yyy zzz xyy xxy xxz xzz yzz yyz xyz
//! 5d : d0 d+1 d-1 d+2 d-2
//! 7f : f0 f+1 f-1 f+2 f-2 f+3 f-3
//! ```
//!
//! ## 依赖关系
//! - 被 `models/molecule.rs`, `parsers/`, `cubeview/grid.rs` 使用

use crate::error::{CubeViewError, Result};

/// 支持的最高 Cartesian 角动量 (g)
pub const MAX_CARTESIAN_L: u32 = 4;

/// 支持的最高球谐角动量 (f)
pub const MAX_PURE_L: u32 = 3;

/// 收缩高斯壳层
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    /// 所属原子 (0-based)
    pub atom: usize,

    /// 角动量
    pub l: u32,

    /// 是否为球谐 (pure) 壳层；p 壳层总按 Cartesian 处理
    pub pure: bool,

    /// 原始高斯指数
    pub exponents: Vec<f64>,

    /// 收缩系数
    pub coefficients: Vec<f64>,
}

impl Shell {
    pub fn new(atom: usize, l: u32, pure: bool, exponents: Vec<f64>, coefficients: Vec<f64>) -> Self {
        Shell {
            atom,
            l,
            pure,
            exponents,
            coefficients,
        }
    }

    /// 是否按球谐分量展开
    pub fn is_pure(&self) -> bool {
        self.pure && self.l >= 2
    }

    /// 分量个数
    pub fn n_components(&self) -> usize {
        let l = self.l as usize;
        if self.is_pure() {
            2 * l + 1
        } else {
            (l + 1) * (l + 2) / 2
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.exponents.is_empty() || self.exponents.len() != self.coefficients.len() {
            return Err(CubeViewError::InvalidFormat(format!(
                "Shell on atom {} (l={}) has {} exponents and {} coefficients",
                self.atom,
                self.l,
                self.exponents.len(),
                self.coefficients.len()
            )));
        }
        if self.exponents.iter().any(|&a| a <= 0.0) {
            return Err(CubeViewError::InvalidFormat(format!(
                "Shell on atom {} (l={}) has a non-positive exponent",
                self.atom, self.l
            )));
        }
        let max_l = if self.is_pure() {
            MAX_PURE_L
        } else {
            MAX_CARTESIAN_L
        };
        if self.l > max_l {
            return Err(CubeViewError::UnsupportedFormat(format!(
                "{} shells with l={} (max {})",
                if self.is_pure() { "Pure" } else { "Cartesian" },
                self.l,
                max_l
            )));
        }
        Ok(())
    }

    /// 分量名称，例如 `px`, `dxy`, `dz^2`, `f+1`
    pub fn component_names(&self) -> Result<Vec<String>> {
        if self.is_pure() {
            let names = pure_orders(self.l)?
                .iter()
                .map(|&m| pure_component_name(self.l, m))
                .collect();
            return Ok(names);
        }

        let letter = shell_letter(self.l);
        let names = cartesian_powers(self.l)?
            .iter()
            .map(|&[a, b, c]| {
                if self.l == 0 {
                    "s".to_string()
                } else {
                    format!(
                        "{}{}{}{}",
                        letter,
                        "x".repeat(a as usize),
                        "y".repeat(b as usize),
                        "z".repeat(c as usize)
                    )
                }
            })
            .collect();
        Ok(names)
    }
}

/// 角动量字母
pub fn shell_letter(l: u32) -> char {
    match l {
        0 => 's',
        1 => 'p',
        2 => 'd',
        3 => 'f',
        4 => 'g',
        5 => 'h',
        _ => '?',
    }
}

/// 字母 -> 角动量（`sp` 壳层由解析器自行拆分）
pub fn letter_to_l(letter: &str) -> Option<u32> {
    match letter.to_ascii_lowercase().as_str() {
        "s" => Some(0),
        "p" => Some(1),
        "d" => Some(2),
        "f" => Some(3),
        "g" => Some(4),
        _ => None,
    }
}

/// Molden 顺序的 Cartesian 幂次
pub fn cartesian_powers(l: u32) -> Result<Vec<[u32; 3]>> {
    let powers = match l {
        0 => vec![[0, 0, 0]],
        1 => vec![[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        2 => vec![
            [2, 0, 0],
            [0, 2, 0],
            [0, 0, 2],
            [1, 1, 0],
            [1, 0, 1],
            [0, 1, 1],
        ],
        3 => vec![
            [3, 0, 0],
            [0, 3, 0],
            [0, 0, 3],
            [1, 2, 0],
            [2, 1, 0],
            [2, 0, 1],
            [1, 0, 2],
            [0, 1, 2],
            [0, 2, 1],
            [1, 1, 1],
        ],
        4 => vec![
            [4, 0, 0],
            [0, 4, 0],
            [0, 0, 4],
            [3, 1, 0],
            [3, 0, 1],
            [1, 3, 0],
            [0, 3, 1],
            [1, 0, 3],
            [0, 1, 3],
            [2, 2, 0],
            [2, 0, 2],
            [0, 2, 2],
            [2, 1, 1],
            [1, 2, 1],
            [1, 1, 2],
        ],
        _ => {
            return Err(CubeViewError::UnsupportedFormat(format!(
                "Cartesian shells with l={}",
                l
            )))
        }
    };
    Ok(powers)
}

/// Molden 顺序的 m 值：0, +1, -1, +2, -2, ...
pub fn pure_orders(l: u32) -> Result<Vec<i32>> {
    if l > MAX_PURE_L {
        return Err(CubeViewError::UnsupportedFormat(format!(
            "Pure shells with l={}",
            l
        )));
    }
    let l = l as i32;
    Ok((0..=l)
        .flat_map(|m| if m == 0 { vec![0] } else { vec![m, -m] })
        .collect())
}

fn pure_component_name(l: u32, m: i32) -> String {
    match (l, m) {
        (2, -2) => "dxy".to_string(),
        (2, -1) => "dyz".to_string(),
        (2, 0) => "dz^2".to_string(),
        (2, 1) => "dxz".to_string(),
        (2, 2) => "dx2-y2".to_string(),
        (l, m) => format!("{}{:+}", shell_letter(l), m),
    }
}
