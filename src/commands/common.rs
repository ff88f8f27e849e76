//! # 命令共享逻辑
//!
//! 读入计算结果、设置并行度、构建视图并执行 prepare。
//!
//! ## 依赖关系
//! - 被 `commands/` 各子命令使用
//! - 使用 `cli/common.rs`, `parsers/`, `cubeview/`, `utils/`

use crate::cli::common::{InputFormat, RenderArgs};
use crate::cubeview::{self, CubeGenerator, CubeView, PrepareOptions, PrepareSummary};
use crate::error::{CubeViewError, Result};
use crate::models::ComputedResult;
use crate::parsers::{self, json_result, molden};
use crate::utils::selection::parse_mo_list;
use crate::utils::{output, progress};

use std::path::Path;

/// 按指定格式读入计算结果
pub fn load_result(input: &Path, format: InputFormat) -> Result<ComputedResult> {
    if !input.exists() {
        return Err(CubeViewError::FileNotFound {
            path: input.display().to_string(),
        });
    }

    let spinner = progress::reading_spinner(&input.display().to_string());
    let result = match format {
        InputFormat::Auto => parsers::parse_result_file(input),
        InputFormat::Json => json_result::parse_json_result_file(input),
        InputFormat::Molden => molden::parse_molden_file(input),
    };
    spinner.finish_and_clear();

    let result = result?;
    output::print_info(&format!("Loaded '{}'", input.display()));
    output::print_field("Molecule", &result.molecule.name);
    output::print_field("Atoms", &result.molecule.atoms.len().to_string());
    output::print_field("Basis", &format!("{} functions", result.molecule.nao()));
    output::print_field("Method", result.method.as_deref().unwrap_or("(custom)"));
    if let Some(ref group) = result.molecule.symmetry {
        output::print_field("Point group", &group.name);
    }
    Ok(result)
}

/// 设置全局线程池
pub fn configure_threads(jobs: usize) {
    let num_threads = if jobs == 0 { num_cpus::get() } else { jobs };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok();
}

/// 由渲染参数构建 prepare 选项
pub fn prepare_options(render: &RenderArgs) -> Result<PrepareOptions> {
    if render.resolution <= 0.0 {
        return Err(CubeViewError::InvalidArgument(format!(
            "--resolution must be positive, got {}",
            render.resolution
        )));
    }
    if render.margin < 0.0 {
        return Err(CubeViewError::InvalidArgument(format!(
            "--margin must not be negative, got {}",
            render.margin
        )));
    }

    Ok(PrepareOptions {
        mo_list: render.mo.as_deref().map(parse_mo_list).transpose()?,
        mo_list_beta: render.mo_beta.as_deref().map(parse_mo_list).transpose()?,
        ao_component: render.ao_component,
        generator: CubeGenerator::new(render.resolution, render.margin),
    })
}

/// 读入、选择策略并生成工作目录
pub fn build_view(
    input: &Path,
    format: InputFormat,
    render: &RenderArgs,
) -> Result<(CubeView, PrepareSummary)> {
    let options = prepare_options(render)?;
    configure_threads(render.jobs);

    let result = load_result(input, format)?;
    let view = cubeview::viewer(result)?;

    if options.mo_list_beta.is_some() && view.source().channels().len() == 1 {
        output::print_warning("--mo-beta is ignored for a restricted result");
    }

    let summary = view.prepare(&options)?;
    output::print_success(&format!(
        "Wrote {} orbital record(s) and {} cube file(s) to '{}'",
        summary.records,
        summary.cubes.len(),
        view.workdir().display()
    ));
    Ok((view, summary))
}
