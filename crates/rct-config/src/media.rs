//! Uploaded file storage.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_root() -> PathBuf {
    PathBuf::from("media")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Directory that holds uploaded attachments (e.g. `mri_reports/`).
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}
