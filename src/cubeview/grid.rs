//! # 实空间网格与基函数求值
//!
//! 在规则网格上对收缩高斯基函数求值，得到单个轨道的实空间振幅。
//!
//! ## 归一化约定
//! - 原始高斯按 `x^l` 方向的分量归一化，再对整个收缩重新归一化
//! - Cartesian 分量 `x^a y^b z^c` 额外乘以
//!   `sqrt((2l-1)!! / ((2a-1)!! (2b-1)!! (2c-1)!!))`
//! - 球谐分量使用实立体谐函数，系数与上述约定一致
//!
//! ## 依赖关系
//! - 被 `cubeview/cube.rs` 使用
//! - 使用 `models/`
//! - 使用 `rayon` 按 x 切片并行

use crate::error::{CubeViewError, Result};
use crate::models::basis::{cartesian_powers, pure_orders};
use crate::models::{Molecule, Shell};
use rayon::prelude::*;
use std::f64::consts::PI;

/// 超过该值的 `alpha * r^2` 视为 0
const EXPONENT_CUTOFF: f64 = 60.0;

/// 规则网格（Bohr）
#[derive(Debug, Clone, PartialEq)]
pub struct CubeGrid {
    /// 原点
    pub origin: [f64; 3],

    /// 每个方向的格点数
    pub counts: [usize; 3],

    /// 每个方向的步长
    pub steps: [f64; 3],
}

impl CubeGrid {
    /// 由分子包围盒、分辨率和边距构造网格
    pub fn around(molecule: &Molecule, resolution: f64, margin: f64) -> Result<Self> {
        if !(resolution > 0.0) {
            return Err(CubeViewError::InvalidArgument(format!(
                "Resolution must be positive, got {}",
                resolution
            )));
        }
        if margin < 0.0 {
            return Err(CubeViewError::InvalidArgument(format!(
                "Margin must not be negative, got {}",
                margin
            )));
        }

        let (lo, hi) = molecule.bounding_box();
        let mut origin = [0.0; 3];
        let mut counts = [0; 3];
        let mut steps = [0.0; 3];

        for k in 0..3 {
            let extent = hi[k] - lo[k] + 2.0 * margin;
            origin[k] = lo[k] - margin;
            counts[k] = ((extent / resolution).ceil() as usize).max(2);
            steps[k] = extent / (counts[k] - 1) as f64;
        }

        Ok(CubeGrid {
            origin,
            counts,
            steps,
        })
    }

    pub fn n_points(&self) -> usize {
        self.counts.iter().product()
    }

    /// 格点坐标
    pub fn point(&self, ix: usize, iy: usize, iz: usize) -> [f64; 3] {
        [
            self.origin[0] + ix as f64 * self.steps[0],
            self.origin[1] + iy as f64 * self.steps[1],
            self.origin[2] + iz as f64 * self.steps[2],
        ]
    }
}

/// 单个原始高斯
#[derive(Debug, Clone)]
struct Primitive {
    exponent: f64,
    coefficient: f64,
}

/// 壳层分量的角向部分
#[derive(Debug, Clone)]
enum Angular {
    /// 每个分量为 (幂次, 归一化因子)
    Cartesian(Vec<([u32; 3], f64)>),
    /// Molden 顺序的 m 值
    Pure { l: u32, ms: Vec<i32> },
}

#[derive(Debug, Clone)]
struct EvalShell {
    center: [f64; 3],
    primitives: Vec<Primitive>,
    angular: Angular,
}

/// 分子的 AO 基函数，可在任意点求值
#[derive(Debug, Clone)]
pub struct GaussianBasis {
    shells: Vec<EvalShell>,
    nao: usize,
}

impl GaussianBasis {
    pub fn new(molecule: &Molecule) -> Result<Self> {
        let mut shells = Vec::with_capacity(molecule.basis.len());
        for shell in &molecule.basis {
            shell.validate()?;
            let center = molecule
                .atoms
                .get(shell.atom)
                .map(|a| a.position)
                .ok_or_else(|| {
                    CubeViewError::InvalidFormat(format!("Shell refers to missing atom {}", shell.atom))
                })?;
            shells.push(EvalShell {
                center,
                primitives: normalized_primitives(shell),
                angular: angular_part(shell)?,
            });
        }

        Ok(GaussianBasis {
            shells,
            nao: molecule.nao(),
        })
    }

    pub fn nao(&self) -> usize {
        self.nao
    }

    /// 在 `point` 处计算所有 AO 的值，写入 `out`
    pub fn evaluate_into(&self, point: [f64; 3], out: &mut [f64]) {
        let mut offset = 0;
        for shell in &self.shells {
            let x = point[0] - shell.center[0];
            let y = point[1] - shell.center[1];
            let z = point[2] - shell.center[2];
            let r2 = x * x + y * y + z * z;

            let radial: f64 = shell
                .primitives
                .iter()
                .filter(|p| p.exponent * r2 < EXPONENT_CUTOFF)
                .map(|p| p.coefficient * (-p.exponent * r2).exp())
                .sum();

            match &shell.angular {
                Angular::Cartesian(components) => {
                    for (i, (pw, norm)) in components.iter().enumerate() {
                        out[offset + i] = radial
                            * norm
                            * x.powi(pw[0] as i32)
                            * y.powi(pw[1] as i32)
                            * z.powi(pw[2] as i32);
                    }
                    offset += components.len();
                }
                Angular::Pure { l, ms } => {
                    for (i, &m) in ms.iter().enumerate() {
                        out[offset + i] = radial * solid_harmonic(*l, m, x, y, z);
                    }
                    offset += ms.len();
                }
            }
        }
    }

    /// 在 `point` 处计算轨道振幅
    pub fn orbital_value(&self, coefficients: &[f64], point: [f64; 3], scratch: &mut [f64]) -> f64 {
        self.evaluate_into(point, scratch);
        scratch
            .iter()
            .zip(coefficients)
            .map(|(ao, c)| ao * c)
            .sum()
    }

    /// 在整个网格上计算轨道振幅，顺序为 x 最慢、z 最快
    pub fn evaluate_orbital(&self, coefficients: &[f64], grid: &CubeGrid) -> Result<Vec<f64>> {
        if coefficients.len() != self.nao {
            return Err(CubeViewError::ContractViolation(format!(
                "Orbital has {} coefficients but the basis has {} functions",
                coefficients.len(),
                self.nao
            )));
        }

        let [_, ny, nz] = grid.counts;
        let mut values = vec![0.0; grid.n_points()];

        values
            .par_chunks_mut(ny * nz)
            .enumerate()
            .for_each(|(ix, slab)| {
                let mut scratch = vec![0.0; self.nao];
                for iy in 0..ny {
                    for iz in 0..nz {
                        let p = grid.point(ix, iy, iz);
                        slab[iy * nz + iz] = self.orbital_value(coefficients, p, &mut scratch);
                    }
                }
            });

        Ok(values)
    }
}

fn double_factorial(n: i32) -> f64 {
    let mut value = 1.0;
    let mut k = n;
    while k > 1 {
        value *= k as f64;
        k -= 2;
    }
    value
}

/// 按 `x^l` 归一化原始高斯，再整体归一化收缩
fn normalized_primitives(shell: &Shell) -> Vec<Primitive> {
    let l = shell.l as i32;
    let axis_norm = |alpha: f64| {
        (2.0 * alpha / PI).powf(0.75) * (4.0 * alpha).powf(0.5 * l as f64)
            / double_factorial(2 * l - 1).sqrt()
    };

    let mut primitives: Vec<Primitive> = shell
        .exponents
        .iter()
        .zip(&shell.coefficients)
        .map(|(&alpha, &c)| Primitive {
            exponent: alpha,
            coefficient: c * axis_norm(alpha),
        })
        .collect();

    // <x^l e^{-a r^2} | x^l e^{-b r^2}>
    let overlap = |a: f64, b: f64| {
        let g = a + b;
        PI.powf(1.5) * double_factorial(2 * l - 1) / (2.0_f64.powi(l) * g.powf(l as f64 + 1.5))
    };

    let mut total = 0.0;
    for p in &primitives {
        for q in &primitives {
            total += p.coefficient * q.coefficient * overlap(p.exponent, q.exponent);
        }
    }
    if total > 0.0 {
        let scale = 1.0 / total.sqrt();
        for p in &mut primitives {
            p.coefficient *= scale;
        }
    }

    primitives
}

fn angular_part(shell: &Shell) -> Result<Angular> {
    if shell.is_pure() {
        return Ok(Angular::Pure {
            l: shell.l,
            ms: pure_orders(shell.l)?,
        });
    }

    let l = shell.l as i32;
    let components = cartesian_powers(shell.l)?
        .into_iter()
        .map(|pw| {
            let denom = double_factorial(2 * pw[0] as i32 - 1)
                * double_factorial(2 * pw[1] as i32 - 1)
                * double_factorial(2 * pw[2] as i32 - 1);
            (pw, (double_factorial(2 * l - 1) / denom).sqrt())
        })
        .collect();
    Ok(Angular::Cartesian(components))
}

/// 实立体谐函数 (d, f)，与 `x^l` 归一化约定配套
fn solid_harmonic(l: u32, m: i32, x: f64, y: f64, z: f64) -> f64 {
    let (x2, y2, z2) = (x * x, y * y, z * z);
    match (l, m) {
        (2, 0) => 0.5 * (2.0 * z2 - x2 - y2),
        (2, 1) => 3.0_f64.sqrt() * x * z,
        (2, -1) => 3.0_f64.sqrt() * y * z,
        (2, 2) => 0.5 * 3.0_f64.sqrt() * (x2 - y2),
        (2, -2) => 3.0_f64.sqrt() * x * y,
        (3, 0) => 0.5 * z * (2.0 * z2 - 3.0 * x2 - 3.0 * y2),
        (3, 1) => (3.0_f64 / 8.0).sqrt() * x * (4.0 * z2 - x2 - y2),
        (3, -1) => (3.0_f64 / 8.0).sqrt() * y * (4.0 * z2 - x2 - y2),
        (3, 2) => 0.5 * 15.0_f64.sqrt() * z * (x2 - y2),
        (3, -2) => 15.0_f64.sqrt() * x * y * z,
        (3, 3) => (5.0_f64 / 8.0).sqrt() * x * (x2 - 3.0 * y2),
        (3, -3) => (5.0_f64 / 8.0).sqrt() * y * (3.0 * x2 - y2),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    fn hydrogen_1s() -> Molecule {
        let atoms = vec![Atom::new("H", [0.0, 0.0, 0.0]).unwrap()];
        let basis = vec![Shell::new(0, 0, false, vec![1.0], vec![1.0])];
        Molecule::new("h", atoms, basis)
    }

    #[test]
    fn test_grid_dimensions() {
        let mol = hydrogen_1s();
        let grid = CubeGrid::around(&mol, 0.5, 2.0).unwrap();

        // extent = 4.0 -> ceil(4.0 / 0.5) = 8 points
        assert_eq!(grid.counts, [8, 8, 8]);
        assert_eq!(grid.origin, [-2.0, -2.0, -2.0]);
        assert!((grid.steps[0] - 4.0 / 7.0).abs() < 1e-12);

        let last = grid.point(7, 7, 7);
        assert!((last[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_rejects_bad_resolution() {
        let mol = hydrogen_1s();
        assert!(CubeGrid::around(&mol, 0.0, 5.0).is_err());
        assert!(CubeGrid::around(&mol, 0.3, -1.0).is_err());
    }

    #[test]
    fn test_normalized_s_function_at_origin() {
        let basis = GaussianBasis::new(&hydrogen_1s()).unwrap();
        let mut out = vec![0.0; 1];
        basis.evaluate_into([0.0, 0.0, 0.0], &mut out);

        // (2a/pi)^(3/4) with a = 1
        let expected = (2.0 / PI).powf(0.75);
        assert!((out[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_p_function_antisymmetric() {
        let atoms = vec![Atom::new("C", [0.0, 0.0, 0.0]).unwrap()];
        let basis = vec![Shell::new(0, 1, false, vec![0.8], vec![1.0])];
        let basis = GaussianBasis::new(&Molecule::new("c", atoms, basis)).unwrap();

        let mut plus = vec![0.0; 3];
        let mut minus = vec![0.0; 3];
        basis.evaluate_into([0.0, 0.0, 0.7], &mut plus);
        basis.evaluate_into([0.0, 0.0, -0.7], &mut minus);

        assert_eq!(plus[0], 0.0);
        assert!(plus[2] > 0.0);
        assert!((plus[2] + minus[2]).abs() < 1e-14);
    }

    #[test]
    fn test_pure_dz2_matches_cartesian_combination() {
        let atoms = vec![Atom::new("Fe", [0.0, 0.0, 0.0]).unwrap()];
        let cart = GaussianBasis::new(&Molecule::new(
            "fe",
            atoms.clone(),
            vec![Shell::new(0, 2, false, vec![0.9], vec![1.0])],
        ))
        .unwrap();
        let pure = GaussianBasis::new(&Molecule::new(
            "fe",
            atoms,
            vec![Shell::new(0, 2, true, vec![0.9], vec![1.0])],
        ))
        .unwrap();

        let p = [0.3, -0.2, 0.5];
        let mut c = vec![0.0; 6];
        let mut s = vec![0.0; 5];
        cart.evaluate_into(p, &mut c);
        pure.evaluate_into(p, &mut s);

        // dz^2 = zz - (xx + yy) / 2 in terms of normalized Cartesians
        let expected = c[2] - 0.5 * (c[0] + c[1]);
        assert!((s[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_orbital_order_and_length() {
        let mol = hydrogen_1s();
        let basis = GaussianBasis::new(&mol).unwrap();
        let grid = CubeGrid::around(&mol, 0.5, 1.25).unwrap();
        let values = basis.evaluate_orbital(&[1.0], &grid).unwrap();

        assert_eq!(grid.counts, [5, 5, 5]);
        assert_eq!(values.len(), grid.n_points());
        // 原子所在的中心格点 (2,2,2) 振幅最大
        let [_, ny, nz] = grid.counts;
        let center = values[2 * ny * nz + 2 * nz + 2];
        assert!(values.iter().all(|&v| v <= center + 1e-15));

        assert!(basis.evaluate_orbital(&[1.0, 0.0], &grid).is_err());
    }
}
