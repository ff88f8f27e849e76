//! # serve 命令实现
//!
//! `--dir` 时直接服务已有目录；否则先生成工作目录，服务结束后删除。
//!
//! ## 依赖关系
//! - 使用 `cli/serve.rs` 定义的参数
//! - 使用 `commands/common.rs`, `server.rs`

use super::common::build_view;
use crate::cli::serve::ServeArgs;
use crate::error::{CubeViewError, Result};
use crate::server;
use crate::utils::output;

/// 执行 serve 命令
pub fn execute(args: ServeArgs) -> Result<()> {
    if let Some(ref dir) = args.dir {
        output::print_header("Serving orbital viewer");
        return server::serve_directory(dir, args.host, args.port);
    }

    let input = args.input.as_ref().ok_or_else(|| {
        CubeViewError::InvalidArgument("either --input or --dir is required".to_string())
    })?;

    output::print_header("Preparing orbital viewer");
    let (view, _) = build_view(input, args.format, &args.render)?;

    let served = view.serve(args.host, args.port);
    let cleaned = view.cleanup();
    finish_serving(served, cleaned)
}

/// 服务器自身的错误优先于清理错误
fn finish_serving(served: Result<()>, cleaned: Result<()>) -> Result<()> {
    served?;
    cleaned
}
