//! # 静态文件服务
//!
//! 以给定目录为根的本地 HTTP 服务，仅支持 GET 静态文件：
//! - `/` 映射到 `index.html`
//! - 查询串被忽略（查看器用 `?t=` 防缓存）
//! - 含 `..` 的路径返回 404
//! - `.gz` 以 `application/gzip` 原样返回，由浏览器端自行解压
//!
//! 无认证、无 TLS，仅用于本机。Ctrl-C 时优雅退出。
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs`, `commands/serve.rs` 使用
//! - 使用 `axum`, `tokio`

use crate::error::{CubeViewError, Result};
use crate::utils::output;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 默认端口
pub const DEFAULT_PORT: u16 = 8000;

/// 阻塞当前线程，直到收到 Ctrl-C
pub fn serve_directory(root: &Path, host: IpAddr, port: u16) -> Result<()> {
    if !root.is_dir() {
        return Err(CubeViewError::DirectoryNotFound {
            path: root.display().to_string(),
        });
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CubeViewError::Server(format!("failed to start runtime: {}", e)))?;

    runtime.block_on(run(root.to_path_buf(), SocketAddr::new(host, port)))
}

async fn run(root: PathBuf, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CubeViewError::Server(format!("cannot bind {}: {}", addr, e)))?;

    output::print_info(&format!(
        "Serving {} at http://{}/ (Ctrl-C to stop)",
        root.display(),
        addr
    ));

    let app = Router::new().fallback(serve_file).with_state(Arc::new(root));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CubeViewError::Server(e.to_string()))?;

    output::print_done("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        output::print_warning(&format!("Cannot listen for Ctrl-C: {}", e));
        std::future::pending::<()>().await;
    }
}

async fn serve_file(State(root): State<Arc<PathBuf>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let Some(mut path) = resolve_request_path(&root, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            output::print_request(method.as_str(), uri.path(), 200);
            ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response()
        }
        Err(_) => {
            output::print_request(method.as_str(), uri.path(), 404);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// 将请求路径映射到根目录下的文件；试图越出根目录时返回 `None`
pub fn resolve_request_path(root: &Path, request: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut depth = 0;

    for segment in request.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains(':') => return None,
            s => {
                path.push(s);
                depth += 1;
            }
        }
    }

    if depth == 0 {
        path.push("index.html");
    }
    Some(path)
}

/// 按扩展名选择 Content-Type
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" | "xyz" | "cube" => "text/plain; charset=utf-8",
        "gz" => "application/gzip",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        let root = Path::new("/srv/view");
        assert_eq!(
            resolve_request_path(root, "/"),
            Some(root.join("index.html"))
        );
        assert_eq!(
            resolve_request_path(root, ""),
            Some(root.join("index.html"))
        );
    }

    #[test]
    fn test_nested_paths() {
        let root = Path::new("/srv/view");
        assert_eq!(
            resolve_request_path(root, "/cubes/alpha_1.cube.gz"),
            Some(root.join("cubes").join("alpha_1.cube.gz"))
        );
        assert_eq!(
            resolve_request_path(root, "/./js//app.js"),
            Some(root.join("js").join("app.js"))
        );
    }

    #[test]
    fn test_escape_rejected() {
        let root = Path::new("/srv/view");
        assert_eq!(resolve_request_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/cubes/../../x"), None);
        assert_eq!(resolve_request_path(root, "/..\\x"), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("1.cube.gz")), "application/gzip");
        assert_eq!(content_type(Path::new("orbitals.json")), "application/json");
        assert_eq!(
            content_type(Path::new("index.HTML")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = serve_directory(&missing, "127.0.0.1".parse().unwrap(), 0).unwrap_err();
        assert!(matches!(err, CubeViewError::DirectoryNotFound { .. }));
    }
}
