//! # 工作目录管理
//!
//! 临时目录的创建、静态查看器资源的写入、导出与清理。
//!
//! ## 目录结构
//! ```text
//! <workdir>/
//! ├── index.html
//! ├── css/style.css
//! ├── js/app.js
//! ├── orbitals.json
//! ├── mol.xyz
//! └── cubes/*.cube.gz
//! ```
//!
//! 静态资源在编译时嵌入二进制。
//!
//! ## 依赖关系
//! - 被 `cubeview/view.rs` 使用
//! - 使用 `tempfile`, `walkdir`

use crate::error::{CubeViewError, Result};

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// 查看器静态资源：(相对路径, 内容)
pub const VIEWER_ASSETS: &[(&str, &str)] = &[
    ("index.html", include_str!("../../static/index.html")),
    ("css/style.css", include_str!("../../static/css/style.css")),
    ("js/app.js", include_str!("../../static/js/app.js")),
];

/// 导出目录中的说明文件
pub const README_NAME: &str = "README.txt";

const README_TEXT: &str = "\
This directory contains the generated cube files and metadata for molecular orbitals.
You can visualize the orbitals using the provided HTML viewer.
To start the viewer, run `cubeview serve --dir <this directory> [--port PORT]` \
(or any static file server, e.g. `python -m http.server [port]`) in this directory \
and open your browser to http://localhost:[port]
";

/// 临时工作目录，drop 时递归删除
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// 创建新的临时目录
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("cubeview-")
            .tempdir()
            .map_err(|e| CubeViewError::FileWriteError {
                path: std::env::temp_dir().display().to_string(),
                source: e,
            })?;
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 写入静态资源
    pub fn prepare(&self) -> Result<()> {
        let root = self.path();
        if !root.is_dir() {
            return Err(CubeViewError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }

        for (relative, content) in VIEWER_ASSETS {
            let target = root.join(relative);
            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }
            fs::write(&target, content).map_err(|e| CubeViewError::FileWriteError {
                path: target.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// 递归复制整个工作目录到 `dest`，同名文件被覆盖
    pub fn export(&self, dest: &Path) -> Result<usize> {
        let root = self.path();
        create_dir(dest)?;

        let mut copied = 0;
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(|e| CubeViewError::FileReadError {
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string()),
                source: e.into(),
            })?;

            // WalkDir 产出的路径都在 root 之下
            let relative = match entry.path().strip_prefix(root) {
                Ok(r) => r,
                Err(_) => continue,
            };
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                create_dir(&target)?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| CubeViewError::FileWriteError {
                    path: target.display().to_string(),
                    source: e,
                })?;
                copied += 1;
            }
        }

        let readme = dest.join(README_NAME);
        fs::write(&readme, README_TEXT).map_err(|e| CubeViewError::FileWriteError {
            path: readme.display().to_string(),
            source: e,
        })?;

        Ok(copied)
    }

    /// 删除工作目录
    pub fn cleanup(self) -> Result<()> {
        let path = self.path().display().to_string();
        self.dir
            .close()
            .map_err(|e| CubeViewError::FileWriteError { path, source: e })
    }

    /// 保留工作目录，不再自动删除
    pub fn keep(self) -> PathBuf {
        self.dir.into_path()
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| CubeViewError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
