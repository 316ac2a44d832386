//! Document export through an external rendering engine
//!
//! The default renderer drives `wkhtmltopdf` as a child process, feeding the
//! HTML on stdin and letting it write the PDF to the destination path.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{ActionError, ActionResult};

/// Executable searched for on `PATH` when no explicit engine is configured.
pub const ENGINE_BINARY: &str = "wkhtmltopdf";

/// Converts an HTML document into a file at `destination`
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, html: &str, destination: &Path) -> ActionResult<()>;

    /// Get the renderer name for logging
    fn name(&self) -> &str;
}

/// Locate the rendering engine.
///
/// An explicit path must point at an existing file. Otherwise each `PATH`
/// entry is searched for [`ENGINE_BINARY`].
pub fn resolve_engine(configured: Option<&Path>) -> ActionResult<PathBuf> {
    if let Some(path) = configured {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ActionError::RenderEngineUnavailable(format!(
                "configured engine '{}' does not exist",
                path.display()
            )))
        };
    }

    let file_name = if cfg!(windows) {
        format!("{ENGINE_BINARY}.exe")
    } else {
        ENGINE_BINARY.to_string()
    };
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            ActionError::RenderEngineUnavailable(format!("'{file_name}' not found on PATH"))
        })
}

/// Renderer backed by the wkhtmltopdf executable
#[derive(Debug, Clone, Default)]
pub struct WkhtmltopdfRenderer {
    engine_path: Option<PathBuf>,
}

impl WkhtmltopdfRenderer {
    /// `None` defers to a `PATH` search on every render.
    pub fn new(engine_path: Option<PathBuf>) -> Self {
        Self { engine_path }
    }

    /// Start-up existence check; failures are repeated at render time.
    pub fn check(&self) -> ActionResult<PathBuf> {
        resolve_engine(self.engine_path.as_deref())
    }
}

#[async_trait]
impl DocumentRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str, destination: &Path) -> ActionResult<()> {
        let engine = self.check()?;
        debug!(engine = %engine.display(), path = %destination.display(), "Spawning rendering engine");

        let mut child = Command::new(&engine)
            .args(["--quiet", "--encoding", "utf-8", "-"])
            .arg(destination)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ActionError::RenderEngineUnavailable(format!(
                    "failed to start '{}': {e}",
                    engine.display()
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| ActionError::RenderFailed(format!("writing HTML to engine: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ActionError::RenderFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, "Rendering engine failed");
            return Err(ActionError::RenderFailed(format!(
                "engine exited with {}: {stderr}",
                output.status
            )));
        }

        if !destination.is_file() {
            return Err(ActionError::RenderFailed(format!(
                "engine reported success but '{}' was not written",
                destination.display()
            )));
        }

        info!(path = %destination.display(), "Document rendered");
        Ok(())
    }

    fn name(&self) -> &str {
        ENGINE_BINARY
    }
}
