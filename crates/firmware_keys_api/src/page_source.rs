//! Where key page markup comes from, and the query path built on it.

use crate::*;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Helper traits for page sources - you only need these if you are
/// implementing a new way of retrieving key pages.
pub mod traits {
    use super::*;

    /// Defines a source of raw key page markup.
    pub trait AsPageSource: 'static + Send + Sync {
        /// Fetch the raw markup of the key page for a device and build.
        /// Must fail with [KeysErrorKind::PageNotFound] if there is none.
        fn fetch_page(
            &self,
            device: Arc<str>,
            build: Arc<str>,
        ) -> BoxFuture<'static, KeysResult<Arc<str>>>;
    }
}

/// Handle to a page source.
#[derive(Clone)]
pub struct PageSource(pub Arc<dyn AsPageSource>);

impl PageSource {
    /// Fetch the raw markup of the key page for a device and build.
    pub fn fetch_page(
        &self,
        device: Arc<str>,
        build: Arc<str>,
    ) -> impl Future<Output = KeysResult<Arc<str>>> + 'static + Send {
        AsPageSource::fetch_page(&*self.0, device, build)
    }

    /// Fetch, tokenize and normalize the key page for a query.
    pub fn get_keys(
        &self,
        query: KeysQuery,
    ) -> impl Future<Output = KeysResult<FirmwareKeySet>> + 'static + Send {
        let inner = self.0.clone();
        async move {
            let page = inner
                .fetch_page(query.device.clone(), query.build.clone())
                .await?;
            let set = extract(&page, query.board_config.as_deref())?;
            query.check_page(&set)?;
            Ok(set)
        }
    }
}

/// A request for the keys of one firmware build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysQuery {
    /// Device identifier, e.g. `iPhone9,3`.
    pub device: Arc<str>,

    /// Build identifier, e.g. `17A577`.
    pub build: Arc<str>,

    /// Board config selecting one variant of a dual-variant page.
    pub board_config: Option<Arc<str>>,
}

impl KeysQuery {
    /// Query a device and build.
    pub fn new(device: impl Into<Arc<str>>, build: impl Into<Arc<str>>) -> Self {
        Self {
            device: device.into(),
            build: build.into(),
            board_config: None,
        }
    }

    /// Select a hardware variant by board config.
    pub fn with_board_config(mut self, board_config: impl Into<Arc<str>>) -> Self {
        self.board_config = Some(board_config.into());
        self
    }

    /// A page for a different device or build is unusable.
    fn check_page(&self, set: &FirmwareKeySet) -> KeysResult<()> {
        if !set.device.eq_ignore_ascii_case(&self.device) {
            return Err(KeysErrorKind::MissingRequiredField.err(format!(
                "page describes device {}, not {}",
                set.device, self.device,
            )));
        }
        if !set.build.eq_ignore_ascii_case(&self.build) {
            return Err(KeysErrorKind::MissingRequiredField.err(format!(
                "page describes build {}, not {}",
                set.build, self.build,
            )));
        }
        Ok(())
    }
}

/// Create an in-memory page source, usually for testing.
pub fn create_mem_page_source() -> (PageSource, MemPageWriter) {
    let inner = Arc::new(RwLock::new(HashMap::new()));
    (
        PageSource(Arc::new(PrivMemPageSource(inner.clone()))),
        MemPageWriter(inner),
    )
}

type MemPages = Arc<RwLock<HashMap<(Arc<str>, Arc<str>), Arc<str>>>>;

/// Adds pages to an in-memory page source.
#[derive(Clone)]
pub struct MemPageWriter(MemPages);

impl MemPageWriter {
    /// Store (or replace) the page for a device and build.
    pub fn insert_page(
        &self,
        device: impl Into<Arc<str>>,
        build: impl Into<Arc<str>>,
        markup: impl Into<Arc<str>>,
    ) {
        self.0
            .write()
            .insert((device.into(), build.into()), markup.into());
    }
}

// -- private -- //

struct PrivMemPageSource(MemPages);

impl AsPageSource for PrivMemPageSource {
    fn fetch_page(
        &self,
        device: Arc<str>,
        build: Arc<str>,
    ) -> BoxFuture<'static, KeysResult<Arc<str>>> {
        let page = self.0.read().get(&(device.clone(), build.clone())).cloned();
        async move {
            page.ok_or_else(|| {
                KeysErrorKind::PageNotFound.err(format!(
                    "no firmware keys page for device: {device}, build: {build}",
                ))
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "{{keys
 | Version = 13.0 GM
 | Build = 17A577
 | Device = iPhone9,3
 | Codename = Yukon
 | Model = d10ap
 | Model2 = d101ap
 | IBSS = iBSS.d10.RELEASE.im4p
 | IBSSIV = 11111111111111111111111111111111
 | IBSSKey = 2222222222222222222222222222222222222222222222222222222222222222
 | IBSS2 = iBSS.d101.RELEASE.im4p
 | IBSS2IV = Unknown
 | RestoreRamdisk = 038-1234-001
}}";

    fn init_tracing() {
        let _ = tracing::subscriber::set_global_default(
            tracing_subscriber::FmtSubscriber::builder()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env(),
                )
                .compact()
                .finish(),
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mem_source_query() {
        init_tracing();

        let (source, writer) = create_mem_page_source();
        writer.insert_page("iPhone9,3", "17A577", PAGE);

        let set = source
            .get_keys(
                KeysQuery::new("iPhone9,3", "17A577").with_board_config("D101AP"),
            )
            .await
            .unwrap();

        assert_eq!("Yukon", &*set.codename);
        assert_eq!(Some("13.0 Golden Master"), set.version.as_deref());
        assert!(set.restore_ramdisk_exists);

        let ibss = set.get("iBSS").unwrap();
        assert_eq!("iBSS.d101.RELEASE.im4p", ibss.filename());
        assert_eq!("", ibss.iv());
        assert_eq!("", ibss.kbag());

        let ramdisk = set.get("RestoreRamdisk").unwrap();
        assert_eq!("038-1234-001.dmg", ramdisk.filename());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mem_source_page_not_found() {
        let (source, _writer) = create_mem_page_source();
        let err = source
            .get_keys(KeysQuery::new("iPhone9,3", "17A577"))
            .await
            .unwrap_err();
        assert_eq!(Some(KeysErrorKind::PageNotFound), KeysErrorKind::of(&err));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mismatched_page_is_unusable() {
        let (source, writer) = create_mem_page_source();
        // search resolved to the wrong build's page
        writer.insert_page("iPhone9,3", "17A578", PAGE);
        let err = source
            .get_keys(
                KeysQuery::new("iPhone9,3", "17A578").with_board_config("d10ap"),
            )
            .await
            .unwrap_err();
        assert_eq!(
            Some(KeysErrorKind::MissingRequiredField),
            KeysErrorKind::of(&err),
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dual_page_needs_board_config() {
        let (source, writer) = create_mem_page_source();
        writer.insert_page("iPhone9,3", "17A577", PAGE);
        let err = source
            .get_keys(KeysQuery::new("iPhone9,3", "17A577"))
            .await
            .unwrap_err();
        assert_eq!(
            Some(KeysErrorKind::AmbiguousVariant),
            KeysErrorKind::of(&err),
        );
    }
}
