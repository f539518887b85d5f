//! Page source reading saved key pages from a directory.

use crate::*;
use firmware_keys_api::dependencies::futures::future::{BoxFuture, FutureExt};
use firmware_keys_api::dependencies::one_err;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of a saved page, the wiki page title plus `.txt`.
pub fn page_file_name(device: &str, build: &str) -> String {
    format!("{build} ({device}).txt")
}

/// Create a page source reading `<dir>/<build> (<device>).txt` files.
pub fn create_dir_page_source<P: Into<PathBuf>>(dir: P) -> PageSource {
    let dir: PathBuf = dir.into();
    PageSource(Arc::new(PrivDirPageSource(dir.into())))
}

// -- private -- //

struct PrivDirPageSource(Arc<Path>);

impl AsPageSource for PrivDirPageSource {
    fn fetch_page(
        &self,
        device: Arc<str>,
        build: Arc<str>,
    ) -> BoxFuture<'static, KeysResult<Arc<str>>> {
        let path = self.0.join(page_file_name(&device, &build));
        async move {
            tracing::info!(?path, "reading firmware keys page");
            match tokio::fs::read_to_string(&path).await {
                Ok(page) => Ok(page.into()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(KeysErrorKind::PageNotFound.err(format!(
                        "no firmware keys page for device: {device}, build: {build}",
                    )))
                }
                Err(e) => Err(one_err::OneErr::new(e)),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "{{keys
 | Version = 10.3.3
 | Build = 14G60
 | Device = iPad7,5
 | Codename = CiderGreenlandUpdate
 | LLB = LLB.j71b.RELEASE.im4p
 | LLBIV = Not Encrypted
 | LLBKey = Not Encrypted
}}";

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_saved_page() {
        let tmpdir = tempdir::TempDir::new("firmware-keys-pages").unwrap();
        tokio::fs::write(
            tmpdir.path().join(page_file_name("iPad7,5", "14G60")),
            PAGE,
        )
        .await
        .unwrap();

        let source = create_dir_page_source(tmpdir.path());
        let set = source
            .get_keys(KeysQuery::new("iPad7,5", "14G60"))
            .await
            .unwrap();
        assert_eq!("CiderGreenlandUpdate", &*set.codename);
        let llb = set.get("LLB").unwrap();
        assert_eq!("", llb.iv());
        assert_eq!("", llb.kbag());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_page_is_page_not_found() {
        let tmpdir = tempdir::TempDir::new("firmware-keys-pages").unwrap();
        let source = create_dir_page_source(tmpdir.path());
        let err = source
            .fetch_page("iPad7,5".into(), "14G60".into())
            .await
            .unwrap_err();
        assert_eq!(Some(KeysErrorKind::PageNotFound), KeysErrorKind::of(&err));
    }
}
