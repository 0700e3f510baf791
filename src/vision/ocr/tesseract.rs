// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tesseract CLI OCR engine

use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{OcrError, TextRecognizer};
use crate::vision::image_utils::encode_png;

/// Default OCR timeout
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(60);

/// OCR engine that shells out to `tesseract <image> stdout -l <lang>`
///
/// Each call writes the image to its own temporary PNG, so concurrent
/// requests never share an input file.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    language: String,
    timeout: Duration,
}

impl TesseractEngine {
    /// Create an engine for the given executable (name on PATH or absolute path)
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: "eng".to_string(),
            timeout: DEFAULT_OCR_TIMEOUT,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Check that the binary can be executed, returning its version banner
    pub async fn check_version(&self) -> Result<String, OcrError> {
        let output = self
            .run_command(Command::new(&self.command).arg("--version"))
            .await?;
        let banner = String::from_utf8_lossy(&output);
        Ok(banner.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Run OCR on an image file already on disk
    pub async fn recognize_file(&self, path: &Path) -> Result<String, OcrError> {
        let stdout = self
            .run_command(
                Command::new(&self.command)
                    .arg(path)
                    .arg("stdout")
                    .arg("-l")
                    .arg(&self.language),
            )
            .await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    async fn run_command(&self, command: &mut Command) -> Result<Vec<u8>, OcrError> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::BinaryNotFound(self.command.clone())
            } else {
                OcrError::Io(e)
            }
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} exited with {}: {}", self.command, output.status, stderr);
            return Err(OcrError::Failed(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            }));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl TextRecognizer for TesseractEngine {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = std::time::Instant::now();

        // Encoding and the scratch file write both block
        let owned = image.clone();
        let input = tokio::task::spawn_blocking(move || -> Result<NamedTempFile, OcrError> {
            let png = encode_png(&owned).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
            let mut file = tempfile::Builder::new()
                .prefix("evision-ocr-")
                .suffix(".png")
                .tempfile()?;
            file.write_all(&png)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| OcrError::InvalidImage(e.to_string()))??;

        debug!("Running {} on {}", self.command, input.path().display());
        let text = self.recognize_file(input.path()).await?;

        info!(
            "OCR complete: {} chars, {}ms",
            text.trim().len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
