use super::*;

pub(crate) async fn exec(opt: OptParse) -> KeysResult<()> {
    let OptParse {
        board_config,
        pretty,
        page_file,
    } = opt;

    let page = tokio::fs::read_to_string(&page_file).await?;
    let set = extract(&page, board_config.as_deref())?;

    tracing::info!(
        device = %set.device,
        build = %set.build,
        keys = set.keys.len(),
        "parsed key page",
    );

    print_key_set(&set, pretty)
}
