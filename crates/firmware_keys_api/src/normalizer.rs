//! Turns a tokenized key page into ordered, consistent key records.

use crate::*;
use time::OffsetDateTime;

const DEVICE_TOKEN: &str = "device";
const BUILD_TOKEN: &str = "build";
const CODENAME_TOKEN: &str = "codename";
const MODEL_TOKEN: &str = "model";
const MODEL2_TOKEN: &str = "model2";
const RESTORE_RAMDISK_TOKEN: &str = "restoreramdisk";
const UPDATE_RAMDISK_TOKEN: &str = "updateramdisk";

const IV_SUFFIX: &str = "iv";
const KEY_SUFFIX: &str = "key";

/// Values editors use in place of key material, compared with case
/// and whitespace removed.
const SENTINELS: &[&str] = &["unknown", "notencrypted"];

/// Page metadata tokens that are not component records.
const METADATA_TOKENS: &[&str] = &[
    DEVICE_TOKEN,
    BUILD_TOKEN,
    CODENAME_TOKEN,
    VERSION_TOKEN,
    MODEL_TOKEN,
    MODEL2_TOKEN,
];

/// Which hardware variant of a page the records describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The `Model` fields, or the only variant of a single-variant page.
    Primary,

    /// The `Model2` fields of a dual-variant page.
    Secondary,
}

impl Variant {
    /// Choose the variant for a page given an optional board config.
    ///
    /// A page that publishes both `Model` and `Model2` requires a
    /// board config matching one of them (case-insensitive).
    /// Single-variant pages ignore the board config.
    pub fn select(
        tokens: &TokenMap,
        board_config: Option<&str>,
    ) -> KeysResult<Self> {
        let models = (
            tokens.get_non_blank(MODEL_TOKEN),
            tokens.get_non_blank(MODEL2_TOKEN),
        );

        let (model, model2) = match models {
            (Some(model), Some(model2)) => (model.trim(), model2.trim()),
            _ => {
                if let Some(board_config) = board_config {
                    tracing::debug!(
                        board_config,
                        "ignoring board config for single variant page"
                    );
                }
                return Ok(Variant::Primary);
            }
        };

        let board_config = match board_config.map(str::trim) {
            Some(b) if !b.is_empty() => b,
            _ => {
                return Err(KeysErrorKind::AmbiguousVariant.err(format!(
                    "page publishes models {model} and {model2}, a board config is required",
                )));
            }
        };

        if board_config.eq_ignore_ascii_case(model) {
            Ok(Variant::Primary)
        } else if board_config.eq_ignore_ascii_case(model2) {
            Ok(Variant::Secondary)
        } else {
            Err(KeysErrorKind::InvalidBoardConfig.err(format!(
                "board config {board_config} matches neither {model} nor {model2}",
            )))
        }
    }
}

/// The tokens one component family's record is built from,
/// after the selected variant's fields have taken precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedFamily<'a> {
    filename: &'a str,
    iv: Option<&'a str>,
    key: Option<&'a str>,
}

impl<'a> ResolvedFamily<'a> {
    fn resolve(
        spec: &ComponentSpec,
        tokens: &'a TokenMap,
        variant: Variant,
    ) -> Option<Self> {
        let field = |suffix: &str| -> Option<&'a str> {
            let secondary = match (variant, spec.secondary_token) {
                (Variant::Secondary, Some(prefix)) => {
                    tokens.get(&format!("{prefix}{suffix}"))
                }
                _ => None,
            };
            secondary.or_else(|| tokens.get(&format!("{}{suffix}", spec.token)))
        };

        Some(Self {
            filename: field("")?,
            iv: field(IV_SUFFIX),
            key: field(KEY_SUFFIX),
        })
    }
}

fn is_sentinel(value: &str) -> bool {
    let squashed: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    squashed.is_empty() || SENTINELS.contains(&squashed.as_str())
}

fn key_material<'a>(image: &str, name: &str, raw: Option<&'a str>) -> &'a str {
    match raw {
        Some(value) if !is_sentinel(value) => value.trim(),
        Some(value) => {
            tracing::debug!(image, name, value, "no usable key material");
            ""
        }
        None => "",
    }
}

/// Tokens that are neither metadata, a component family, nor
/// key material of one, sorted.
fn unrecognized_tokens(tokens: &TokenMap) -> Vec<&str> {
    let mut out: Vec<&str> = tokens
        .iter()
        .map(|(name, _)| name)
        .filter(|name| {
            !METADATA_TOKENS.contains(name)
                && !is_reserved_token(name)
                && component_for_token(name).is_none()
        })
        .collect();
    out.sort_unstable();
    out
}

fn required<'a>(tokens: &'a TokenMap, name: &str) -> KeysResult<&'a str> {
    tokens.get_non_blank(name).map(str::trim).ok_or_else(|| {
        KeysErrorKind::MissingRequiredField
            .err(format!("page is missing required field '{name}'"))
    })
}

/// Build the key set of a tokenized page, stamped with the current time.
pub fn normalize(
    tokens: &TokenMap,
    board_config: Option<&str>,
) -> KeysResult<FirmwareKeySet> {
    normalize_at(tokens, board_config, OffsetDateTime::now_utc())
}

/// Build the key set of a tokenized page, stamped with `date`.
pub fn normalize_at(
    tokens: &TokenMap,
    board_config: Option<&str>,
    date: OffsetDateTime,
) -> KeysResult<FirmwareKeySet> {
    let device = required(tokens, DEVICE_TOKEN)?;
    let build = required(tokens, BUILD_TOKEN)?;
    let codename = required(tokens, CODENAME_TOKEN)?;

    let variant = Variant::select(tokens, board_config)?;

    let unrecognized = unrecognized_tokens(tokens);
    if !unrecognized.is_empty() {
        tracing::debug!(?unrecognized, "page fields match no component");
    }

    let mut keys = Vec::new();
    for spec in COMPONENTS {
        let family = match ResolvedFamily::resolve(spec, tokens, variant) {
            Some(family) => family,
            None => {
                tracing::trace!(image = spec.image, "component not on page");
                continue;
            }
        };

        let iv = key_material(spec.image, IV_SUFFIX, family.iv);
        let key = key_material(spec.image, KEY_SUFFIX, family.key);

        keys.push(KeyRecord::new(
            spec.image,
            derive_filename(family.filename),
            date,
            iv,
            key,
        ));
    }

    Ok(FirmwareKeySet {
        device: device.into(),
        build: build.into(),
        codename: codename.into(),
        restore_ramdisk_exists: tokens.contains(RESTORE_RAMDISK_TOKEN),
        update_ramdisk_exists: tokens.contains(UPDATE_RAMDISK_TOKEN),
        version: tokens.get_non_blank(VERSION_TOKEN).map(Into::into),
        keys,
    })
}

/// Tokenize and normalize raw page markup in one step.
pub fn extract(
    raw_markup: &str,
    board_config: Option<&str>,
) -> KeysResult<FirmwareKeySet> {
    normalize(&tokenize(raw_markup), board_config)
}
