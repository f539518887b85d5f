//! Normalized output records.

use crate::*;
use std::sync::Arc;
use time::OffsetDateTime;

/// Raw filenames starting with this character are disk image names
/// published without their extension.
const DISK_IMAGE_PREFIX: char = '0';
const DISK_IMAGE_SUFFIX: &str = ".dmg";

/// Recover the likely real filename from a published value.
///
/// Values beginning with `0` are disk image names (`038-1234-001`)
/// and get `.dmg` appended. This is a guess carried over for output
/// compatibility, it is not known to be correct for every page.
pub fn derive_filename(raw: &str) -> String {
    if raw.starts_with(DISK_IMAGE_PREFIX) {
        format!("{raw}{DISK_IMAGE_SUFFIX}")
    } else {
        raw.to_string()
    }
}

/// Decryption material for one firmware image component.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyRecord {
    image: Arc<str>,
    filename: String,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    iv: String,
    key: String,
    kbag: String,
}

impl KeyRecord {
    /// Build a record. Empty `iv` or `key` means unknown / unencrypted,
    /// the kbag is `iv` followed by `key` only when both are present.
    pub fn new(
        image: impl Into<Arc<str>>,
        filename: impl Into<String>,
        date: OffsetDateTime,
        iv: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let iv = iv.into();
        let key = key.into();
        let kbag = if iv.is_empty() || key.is_empty() {
            String::new()
        } else {
            format!("{iv}{key}")
        };
        Self {
            image: image.into(),
            filename: filename.into(),
            date,
            iv,
            key,
            kbag,
        }
    }

    /// Canonical component identifier, e.g. `iBoot`.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Encrypted file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Extraction time.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// Hex IV, empty when not published.
    pub fn iv(&self) -> &str {
        &self.iv
    }

    /// Hex key, empty when not published.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// `iv` followed by `key`, empty unless both are present.
    pub fn kbag(&self) -> &str {
        &self.kbag
    }
}

/// All key records of one firmware build, as served to consumers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FirmwareKeySet {
    /// Device identifier, e.g. `iPhone9,3`.
    #[serde(rename = "identifier")]
    pub device: Arc<str>,

    /// Build identifier, e.g. `17A577`.
    #[serde(rename = "buildid")]
    pub build: Arc<str>,

    /// Firmware codename.
    pub codename: Arc<str>,

    /// The page lists a restore ramdisk.
    #[serde(rename = "restoreramdiskexists")]
    pub restore_ramdisk_exists: bool,

    /// The page lists an update ramdisk.
    #[serde(rename = "updateramdiskexists")]
    pub update_ramdisk_exists: bool,

    /// Display-only version line of the page.
    #[serde(skip)]
    pub version: Option<Arc<str>>,

    /// Records in component table order.
    pub keys: Vec<KeyRecord>,
}

impl FirmwareKeySet {
    /// Find the record for a canonical component identifier.
    pub fn get(&self, image: &str) -> Option<&KeyRecord> {
        self.keys.iter().find(|r| r.image() == image)
    }

    /// Encode as the consumer JSON object.
    pub fn to_json(&self, pretty: bool) -> KeysResult<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
        .map_err(one_err::OneErr::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filename_heuristic() {
        assert_eq!("012345.dmg", derive_filename("012345"));
        assert_eq!("installd", derive_filename("installd"));
        assert_eq!("", derive_filename(""));
    }

    #[test]
    fn kbag_requires_both_halves() {
        let now = OffsetDateTime::UNIX_EPOCH;
        assert_eq!("aabb", KeyRecord::new("iBoot", "f", now, "aa", "bb").kbag());
        assert_eq!("", KeyRecord::new("iBoot", "f", now, "aa", "").kbag());
        assert_eq!("", KeyRecord::new("iBoot", "f", now, "", "bb").kbag());
    }

    #[test]
    fn json_field_names() {
        let set = FirmwareKeySet {
            device: "iPhone9,3".into(),
            build: "17A577".into(),
            codename: "D10".into(),
            restore_ramdisk_exists: true,
            update_ramdisk_exists: false,
            version: Some("13.0".into()),
            keys: vec![KeyRecord::new(
                "iBoot",
                "iBoot.d10",
                OffsetDateTime::UNIX_EPOCH,
                "aa",
                "bb",
            )],
        };
        let json: serde_json::Value =
            serde_json::from_str(&set.to_json(false).unwrap()).unwrap();
        assert_eq!(
            serde_json::json!({
                "identifier": "iPhone9,3",
                "buildid": "17A577",
                "codename": "D10",
                "restoreramdiskexists": true,
                "updateramdiskexists": false,
                "keys": [{
                    "image": "iBoot",
                    "filename": "iBoot.d10",
                    "date": "1970-01-01T00:00:00Z",
                    "iv": "aa",
                    "key": "bb",
                    "kbag": "aabb",
                }],
            }),
            json,
        );
    }
}
