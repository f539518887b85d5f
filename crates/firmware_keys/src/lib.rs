#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(warnings)]

//! Firmware keys command line tool library.
//!
//! Saved key pages live in a page directory named by a yaml config file
//! in the tool's root directory, see [CONFIG_N].

#[allow(unused_imports)]
use firmware_keys_api::prelude::*;

/// Re-exported dependencies.
pub mod dependencies {
    pub use firmware_keys_api;
    pub use firmware_keys_api::dependencies::*;
    pub use serde_yaml;
    pub use tokio;
    pub use tracing_subscriber;
}

mod config;
pub use config::*;

pub mod dir_source;

/// Install the stderr tracing subscriber, filtered by `RUST_LOG`.
/// Stdout is reserved for json output.
pub fn init_tracing() {
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .compact()
            .finish(),
    );
}
