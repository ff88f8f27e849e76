//! # 轨道可视化视图
//!
//! 将 `OrbitalSource` 与临时工作目录组合，提供统一的
//! `prepare` / `serve` / `export` / `cleanup` 接口。
//!
//! ## prepare 流程
//! 1. 校验前置条件与轨道选择（失败时不写任何文件）
//! 2. 写入静态资源
//! 3. 对称性标签 -> `orbitals.json`
//! 4. `mol.xyz`
//! 5. 每个选中的轨道生成一个 `cubes/*.cube.gz`
//!
//! 中途失败会留下部分填充的工作目录。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `cubeview/source.rs`, `cubeview/workspace.rs`, `cubeview/cube.rs`, `server.rs`

use super::cube::CubeGenerator;
use super::grid::GaussianBasis;
use super::metadata::write_records_json;
use super::source::OrbitalSource;
use super::workspace::Workspace;
use crate::error::{CubeViewError, Result};
use crate::models::{ComputedResult, OrbitalSet, Spin};
use crate::server;
use crate::utils::output;
use crate::utils::progress::cube_progress_bar;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// 轨道元数据文件名
pub const ORBITALS_JSON: &str = "orbitals.json";

/// 分子结构文件名
pub const MOLECULE_XYZ: &str = "mol.xyz";

/// cube 文件子目录
pub const CUBES_DIR: &str = "cubes";

/// prepare 选项
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// 选中的轨道（1 起），`None` 或空表示全部；非限制性结果对应 alpha
    pub mo_list: Option<Vec<usize>>,

    /// 非限制性结果的 beta 选择
    pub mo_list_beta: Option<Vec<usize>>,

    /// 每个轨道附带的 AO 成分数，0 表示不附带
    pub ao_component: usize,

    pub generator: CubeGenerator,
}

/// 单个待生成的 cube
#[derive(Debug, Clone, PartialEq)]
struct CubeJob {
    spin: Option<Spin>,
    index: usize,
}

impl CubeJob {
    fn file_name(&self) -> String {
        cube_file_name(self.spin, self.index)
    }
}

/// cube 文件名：`{index}.cube.gz` 或 `{alpha|beta}_{index}.cube.gz`
pub fn cube_file_name(spin: Option<Spin>, index: usize) -> String {
    match spin {
        Some(spin) => format!("{}_{}.cube.gz", spin.name(), index),
        None => format!("{}.cube.gz", index),
    }
}

/// prepare 结果摘要
#[derive(Debug, Clone)]
pub struct PrepareSummary {
    pub records: usize,
    pub cubes: Vec<PathBuf>,
}

/// 轨道可视化视图
#[derive(Debug)]
pub struct CubeView {
    source: OrbitalSource,
    workspace: Workspace,
}

impl CubeView {
    /// 选择策略后创建工作目录；方法不受支持时不会创建目录
    pub fn new(result: ComputedResult) -> Result<Self> {
        let source = OrbitalSource::select(result)?;
        let workspace = Workspace::new()?;
        Ok(CubeView { source, workspace })
    }

    pub fn source(&self) -> &OrbitalSource {
        &self.source
    }

    pub fn workdir(&self) -> &Path {
        self.workspace.path()
    }

    /// 生成工作目录内容
    pub fn prepare(&self, options: &PrepareOptions) -> Result<PrepareSummary> {
        let molecule = self.source.molecule();
        molecule.validate()?;
        self.source.check_preconditions(options.ao_component)?;
        let jobs = self.cube_jobs(options)?;

        self.workspace.prepare()?;
        let root = self.workspace.path();

        // orbitals.json
        let records = self.source.orbital_records(options.ao_component)?;
        let json_path = root.join(ORBITALS_JSON);
        let file = File::create(&json_path).map_err(|e| CubeViewError::FileWriteError {
            path: json_path.display().to_string(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        write_records_json(&mut writer, &records)?;
        writer.flush().map_err(|e| CubeViewError::FileWriteError {
            path: json_path.display().to_string(),
            source: e,
        })?;

        // mol.xyz
        let xyz_path = root.join(MOLECULE_XYZ);
        fs::write(&xyz_path, molecule.to_xyz_string()).map_err(|e| {
            CubeViewError::FileWriteError {
                path: xyz_path.display().to_string(),
                source: e,
            }
        })?;

        // cubes/
        let cube_dir = root.join(CUBES_DIR);
        fs::create_dir_all(&cube_dir).map_err(|e| CubeViewError::FileWriteError {
            path: cube_dir.display().to_string(),
            source: e,
        })?;

        output::print_info(&format!(
            "Rendering {} cube file(s) for {} ({})",
            jobs.len(),
            molecule.name,
            self.source.kind()
        ));

        let basis = GaussianBasis::new(molecule)?;
        let pb = cube_progress_bar(jobs.len() as u64);
        let mut cubes = Vec::with_capacity(jobs.len());

        for job in &jobs {
            let name = job.file_name();
            pb.set_message(name.clone());

            let set = self.channel(job.spin)?;
            let output_path = cube_dir.join(&name);
            options
                .generator
                .generate(molecule, &basis, &set.column(job.index - 1), &output_path)?;

            cubes.push(output_path);
            pb.inc(1);
        }
        pb.finish_with_message("done");

        Ok(PrepareSummary {
            records: records.len(),
            cubes,
        })
    }

    /// 阻塞地提供工作目录的静态文件服务
    pub fn serve(&self, host: IpAddr, port: u16) -> Result<()> {
        server::serve_directory(self.workspace.path(), host, port)
    }

    /// 导出工作目录
    pub fn export(&self, path: &Path) -> Result<usize> {
        self.workspace.export(path)
    }

    /// 删除工作目录
    pub fn cleanup(self) -> Result<()> {
        self.workspace.cleanup()
    }

    /// 保留工作目录并返回其路径
    pub fn keep(self) -> PathBuf {
        self.workspace.keep()
    }

    fn channel(&self, spin: Option<Spin>) -> Result<&OrbitalSet> {
        self.source
            .channels()
            .into_iter()
            .find(|(s, _)| *s == spin)
            .map(|(_, set)| set)
            .ok_or_else(|| {
                CubeViewError::ContractViolation(format!(
                    "No {} orbitals in a {} view",
                    spin.map(Spin::name).unwrap_or("spin-free"),
                    self.source.kind()
                ))
            })
    }

    /// 解析每个通道的轨道选择并检查范围
    fn cube_jobs(&self, options: &PrepareOptions) -> Result<Vec<CubeJob>> {
        let mut jobs = Vec::new();
        for (spin, set) in self.source.channels() {
            let selection = match spin {
                Some(Spin::Beta) => options.mo_list_beta.as_deref(),
                _ => options.mo_list.as_deref(),
            };
            for index in resolve_selection(selection, set.n_orbitals(), spin)? {
                jobs.push(CubeJob { spin, index });
            }
        }
        Ok(jobs)
    }
}

/// `None` 或空选择表示全部轨道；索引须在 `1..=n` 内
fn resolve_selection(selection: Option<&[usize]>, n: usize, spin: Option<Spin>) -> Result<Vec<usize>> {
    match selection {
        None | Some([]) => Ok((1..=n).collect()),
        Some(list) => {
            if let Some(bad) = list.iter().find(|&&i| i == 0 || i > n) {
                return Err(CubeViewError::ContractViolation(format!(
                    "Orbital index {} is out of range 1..={}{}",
                    bad,
                    n,
                    spin.map(|s| format!(" ({})", s.name())).unwrap_or_default()
                )));
            }
            Ok(list.to_vec())
        }
    }
}
