//! # export 命令实现
//!
//! 生成工作目录，复制到 `--output` 并写入 README.txt，然后删除临时目录。
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的参数
//! - 使用 `commands/common.rs`, `utils/output.rs`

use super::common::build_view;
use crate::cli::export::ExportArgs;
use crate::error::Result;
use crate::utils::output;

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    output::print_header("Exporting orbital viewer");

    let (view, _) = build_view(&args.input, args.format, &args.render)?;

    let copied = view.export(&args.output)?;
    view.cleanup()?;

    output::print_done(&format!(
        "Exported {} file(s) to '{}'",
        copied,
        args.output.display()
    ));
    output::print_info(&format!(
        "View with: cubeview serve --dir {}",
        args.output.display()
    ));
    Ok(())
}
