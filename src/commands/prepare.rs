//! # prepare 命令实现
//!
//! 生成工作目录；`--keep` 时保留并打印路径，否则结束后删除。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs` 定义的参数
//! - 使用 `commands/common.rs`, `utils/output.rs`

use super::common::build_view;
use crate::cli::prepare::PrepareArgs;
use crate::error::Result;
use crate::utils::output;

/// 执行 prepare 命令
pub fn execute(args: PrepareArgs) -> Result<()> {
    output::print_header("Preparing orbital viewer");

    let (view, _) = build_view(&args.input, args.format, &args.render)?;

    if args.keep {
        let path = view.keep();
        output::print_done(&format!("Workspace kept at '{}'", path.display()));
    } else {
        view.cleanup()?;
        output::print_skip("Workspace removed (use --keep to retain it)");
    }
    Ok(())
}
