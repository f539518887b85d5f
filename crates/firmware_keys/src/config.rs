use crate::*;
use firmware_keys_api::dependencies::one_err;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the configuration inside the root directory.
pub const CONFIG_N: &str = "firmware-keys-config.yaml";

const DEFAULT_PAGE_DIR: &str = "pages";

/// Firmware keys tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareKeysConfigInner {
    /// Directory holding saved key pages, named like the wiki page
    /// title: `<build> (<device>).txt`. Relative paths are resolved
    /// against the root directory.
    pub page_dir: PathBuf,

    /// Pretty-print the json output.
    #[serde(default)]
    pub pretty: bool,
}

/// Shared firmware keys configuration.
pub type FirmwareKeysConfig = Arc<FirmwareKeysConfigInner>;

impl Default for FirmwareKeysConfigInner {
    fn default() -> Self {
        Self {
            page_dir: PathBuf::from(DEFAULT_PAGE_DIR),
            pretty: false,
        }
    }
}

impl std::fmt::Display for FirmwareKeysConfigInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_yaml::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&s)
    }
}

impl FirmwareKeysConfigInner {
    /// Decode a yaml encoded config.
    pub fn from_bytes(bytes: &[u8]) -> KeysResult<Self> {
        serde_yaml::from_slice(bytes).map_err(one_err::OneErr::new)
    }

    /// Resolve the page directory against a root directory.
    pub fn page_dir_in(&self, root: &Path) -> PathBuf {
        if self.page_dir.is_absolute() {
            self.page_dir.clone()
        } else {
            root.join(&self.page_dir)
        }
    }
}

/// Load the config file from a root directory.
pub async fn load_config(root: &Path) -> KeysResult<FirmwareKeysConfig> {
    let config_n = root.join(CONFIG_N);

    let bytes = match tokio::fs::read(&config_n).await {
        Err(e) => {
            return Err(format!(
                "Could not read config file {config_n:?}, did you run init? - {e}",
            )
            .into());
        }
        Ok(b) => b,
    };

    let mut config = FirmwareKeysConfigInner::from_bytes(&bytes)?;
    config.page_dir = config.page_dir_in(root);

    tracing::debug!(?config, "loaded config");

    Ok(Arc::new(config))
}
