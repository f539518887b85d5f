use super::*;
use firmware_keys::dir_source::create_dir_page_source;

pub(crate) async fn exec(
    config: FirmwareKeysConfig,
    opt: OptKeys,
) -> KeysResult<()> {
    let OptKeys {
        board_config,
        pretty,
        device,
        build,
    } = opt;

    tracing::info!(%device, %build, ?board_config, "getting firmware keys");

    let mut query = KeysQuery::new(device, build);
    if let Some(board_config) = board_config {
        query = query.with_board_config(board_config);
    }

    let source = create_dir_page_source(config.page_dir.clone());
    let set = source.get_keys(query).await?;

    print_key_set(&set, pretty || config.pretty)
}
