//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the session and the draft order
    #[arg(long, env = "ORDERDESK_DATA_DIR", default_value = ".orderdesk")]
    pub data_dir: PathBuf,
}
