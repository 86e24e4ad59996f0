//! External transform tools.

use std::{ffi::OsString, path::Path, process::Stdio, time::Duration};

use {async_trait::async_trait, tokio::process::Command, tracing::debug};

use crate::error::{Error, Result};

/// Derives downscaled or still-frame variants of stored media.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Downscale an image so its width fits `max_width`, keeping aspect.
    async fn resize(&self, input: &Path, output: &Path, max_width: u32) -> Result<()>;

    /// Extract the first frame of a video as a still image.
    async fn extract_frame(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Shells out to imagemagick and ffmpeg.
///
/// Tool paths come from config so deployments can point at wrappers or
/// absolute locations. Every invocation runs under a timeout.
pub struct CommandTransformer {
    convert_path: String,
    ffmpeg_path: String,
    timeout: Duration,
}

impl CommandTransformer {
    #[must_use]
    pub fn new(
        convert_path: impl Into<String>,
        ffmpeg_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            convert_path: convert_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    async fn run(&self, program: &str, args: Vec<OsString>) -> Result<()> {
        debug!(program, ?args, timeout_secs = self.timeout.as_secs(), "transform start");

        let mut cmd = Command::new(program);
        cmd.args(&args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // A timed-out tool must not keep running after we give up on it.
        cmd.kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::transform(format!("failed to start {program}: {e}")))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::transform(format!("{program} failed: {e}"))),
            Err(_) => {
                return Err(Error::transform(format!(
                    "{program} timed out after {}s",
                    self.timeout.as_secs()
                )));
            },
        };

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::transform(format!(
                "{program} exited with {code}: {}",
                stderr.trim()
            )));
        }

        debug!(program, "transform done");
        Ok(())
    }
}

#[async_trait]
impl Transformer for CommandTransformer {
    async fn resize(&self, input: &Path, output: &Path, max_width: u32) -> Result<()> {
        let args = vec![
            input.as_os_str().to_os_string(),
            OsString::from("-resize"),
            OsString::from(format!("{max_width}x")),
            output.as_os_str().to_os_string(),
        ];
        self.run(&self.convert_path, args).await
    }

    async fn extract_frame(&self, input: &Path, output: &Path) -> Result<()> {
        let args = vec![
            OsString::from("-y"),
            OsString::from("-i"),
            input.as_os_str().to_os_string(),
            OsString::from("-frames:v"),
            OsString::from("1"),
            output.as_os_str().to_os_string(),
        ];
        self.run(&self.ffmpeg_path, args).await
    }
}
