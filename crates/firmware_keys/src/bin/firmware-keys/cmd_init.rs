use super::*;
use tokio::io::AsyncWriteExt;

pub(crate) async fn exec(root: std::path::PathBuf) -> KeysResult<()> {
    let config_n = root.join(CONFIG_N);

    if tokio::fs::metadata(&config_n).await.is_ok() {
        return Err(format!(
            "{config_n:?} already exists - refusing to overwrite existing config",
        )
        .into());
    }

    let config = FirmwareKeysConfigInner::default();

    tokio::fs::DirBuilder::new()
        .recursive(true)
        .create(config.page_dir_in(&root))
        .await?;

    let mut config_f = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_n)
        .await?;

    config_f.write_all(config.to_string().as_bytes()).await?;
    config_f.shutdown().await?;
    drop(config_f);

    eprintln!("# firmware-keys init config:\n{config_n:?}");

    Ok(())
}
