//! On-disk storage for uploaded files.
//!
//! Files live under a media root; the database stores the path relative to
//! that root.

use std::path::{Path, PathBuf};

use crate::error::DatabaseError;

const MRI_REPORT_DIR: &str = "mri_reports";
const FALLBACK_NAME: &str = "report";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored relative path.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write an MRI report for a visit and return its relative path,
    /// `mri_reports/<visit_id>-<name>`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Io` if the directory or file cannot be written.
    pub async fn save_mri_report(
        &self,
        visit_id: i64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, DatabaseError> {
        let relative = format!("{MRI_REPORT_DIR}/{visit_id}-{}", sanitize_file_name(file_name));
        let dir = self.root.join(MRI_REPORT_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(self.resolve(&relative), bytes).await?;
        tracing::debug!(visit_id, path = %relative, size = bytes.len(), "mri report stored");
        Ok(relative)
    }
}

/// Keep only the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
