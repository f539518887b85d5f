#![deny(missing_docs)]
#![deny(unsafe_code)]

//! Firmware key extraction control binary

use firmware_keys::*;
use firmware_keys_api::prelude::*;
use structopt::StructOpt;

mod cmd_init;
mod cmd_keys;
mod cmd_parse;

#[derive(Debug, StructOpt)]
pub(crate) struct OptParse {
    /// Board config selecting one hardware variant, required
    /// for pages publishing both a Model and a Model2.
    #[structopt(short = "b", long, verbatim_doc_comment)]
    pub board_config: Option<String>,

    /// Pretty-print the json output.
    #[structopt(long)]
    pub pretty: bool,

    /// Saved key page markup file.
    #[structopt(verbatim_doc_comment)]
    pub page_file: std::path::PathBuf,
}

#[derive(Debug, StructOpt)]
pub(crate) struct OptKeys {
    /// Board config selecting one hardware variant, required
    /// for pages publishing both a Model and a Model2.
    #[structopt(short = "b", long, verbatim_doc_comment)]
    pub board_config: Option<String>,

    /// Pretty-print the json output, regardless of config.
    #[structopt(long)]
    pub pretty: bool,

    /// Device identifier, e.g. iPhone9,3.
    pub device: String,

    /// Build identifier, e.g. 17A577.
    pub build: String,
}

#[derive(Debug, StructOpt)]
enum Cmd {
    /// Write a default config file to the root directory.
    /// Refuses to overwrite an existing config.
    #[structopt(verbatim_doc_comment)]
    Init,

    /// Extract the keys of a saved key page file and
    /// print them as json.
    #[structopt(verbatim_doc_comment)]
    Parse(OptParse),

    /// Look up the saved page for a device and build in the
    /// configured page directory and print its keys as json.
    /// Note you must have initialized a config file first with
    /// 'firmware-keys init'.
    #[structopt(verbatim_doc_comment)]
    Keys(OptKeys),
}

#[derive(Debug, StructOpt)]
#[structopt(about = "firmware key page extraction")]
struct Opt {
    /// Root directory holding the config file.
    #[structopt(short = "r", long, default_value = ".", env = "FIRMWARE_KEYS_ROOT")]
    root: std::path::PathBuf,

    /// The subcommand to execute
    #[structopt(subcommand)]
    cmd: Cmd,
}

pub(crate) fn print_key_set(set: &FirmwareKeySet, pretty: bool) -> KeysResult<()> {
    println!("{}", set.to_json(pretty)?);
    Ok(())
}

async fn exec() -> KeysResult<()> {
    let Opt { root, cmd } = Opt::from_args();
    if let Cmd::Init = cmd {
        tokio::fs::DirBuilder::new()
            .recursive(true)
            .create(&root)
            .await?;
    }
    let root = dunce::canonicalize(&root)?;
    match cmd {
        Cmd::Init => cmd_init::exec(root).await,
        Cmd::Parse(opt) => cmd_parse::exec(opt).await,
        Cmd::Keys(opt) => {
            let config = load_config(root.as_path()).await?;
            cmd_keys::exec(config, opt).await
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();
    if let Err(e) = exec().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
