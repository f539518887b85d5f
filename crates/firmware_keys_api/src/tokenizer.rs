//! Splits firmware key wiki template markup into raw named fields.

use std::collections::HashMap;

const TEMPLATE_OPEN: &str = "{{";
const TEMPLATE_CLOSE: &str = "}}";

/// The token name the page's version / title line is stored under.
pub const VERSION_TOKEN: &str = "version";

/// Abbreviation used by wiki editors in the version line, and its expansion.
const GM_SYNONYM: (&str, &str) = ("GM", "Golden Master");

/// One `name = value` field as written in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField<'a> {
    /// Field name as written (case not yet normalized).
    pub name: &'a str,

    /// Field value, surrounding whitespace trimmed.
    pub value: &'a str,
}

impl<'a> RawField<'a> {
    /// Split a field on its first `=`. Fields without one are not fields.
    pub fn parse(field: &'a str) -> Option<Self> {
        let (name, value) = field.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            value: value.trim(),
        })
    }
}

/// Lower-case field name to raw field value, as tokenized from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap(HashMap<String, String>);

impl TokenMap {
    /// An empty token map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, later insertions overwrite earlier ones.
    /// The name is lower-cased.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        self.0.insert(name.as_ref().to_lowercase(), value.into())
    }

    /// Raw value of a (lower-case) token.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Raw value of a token, treating blank values as absent.
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    /// True when the token is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was tokenized.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tokens in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut out = TokenMap::new();
        for (name, value) in iter {
            out.insert(name, value);
        }
        out
    }
}

/// Tokenize raw page markup.
/// Never fails: input without a template invocation yields an empty map.
pub fn tokenize(raw_markup: &str) -> TokenMap {
    let mut out = TokenMap::new();

    let body = match template_body(raw_markup) {
        Some(body) => body,
        None => {
            tracing::debug!("no template invocation found in page markup");
            return out;
        }
    };

    for field in split_fields(body) {
        let field = field.trim();
        if field.is_empty() || field == TEMPLATE_OPEN || field == TEMPLATE_CLOSE
        {
            continue;
        }
        match RawField::parse(field) {
            Some(RawField { name, value }) => {
                out.insert(name, value);
            }
            None => tracing::trace!(?field, "discarding markup field"),
        }
    }

    let version = match out.get(VERSION_TOKEN) {
        Some(version) => Some(expand_gm(version)),
        None => version_line(body),
    };
    if let Some(version) = version {
        out.insert(VERSION_TOKEN, version);
    }

    out
}

/// The text between the first `{{` and its matching `}}`.
/// An unterminated template runs to the end of the input.
fn template_body(raw: &str) -> Option<&str> {
    let start = raw.find(TEMPLATE_OPEN)? + TEMPLATE_OPEN.len();
    let rest = &raw[start..];

    let bytes = rest.as_bytes();
    let mut depth = 0_usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match &bytes[i..i + 2] {
            b"{{" => {
                depth += 1;
                i += 2;
            }
            b"}}" if depth == 0 => return Some(&rest[..i]),
            b"}}" => {
                depth -= 1;
                i += 2;
            }
            _ => i += 1,
        }
    }

    Some(rest)
}

/// Split a template body on line breaks and top-level `|` separators.
/// Pipes inside nested templates or wiki links belong to those.
fn split_fields(body: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = body.as_bytes();
    let mut depth = 0_usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let pair = bytes.get(i..i + 2).unwrap_or(&[]);
        match bytes[i] {
            b'{' | b'[' if pair == b"{{" || pair == b"[[" => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' | b']'
                if depth > 0 && (pair == b"}}" || pair == b"]]") =>
            {
                depth -= 1;
                i += 2;
                continue;
            }
            b'\n' | b'\r' => {
                out.push(&body[start..i]);
                start = i + 1;
            }
            b'|' if depth == 0 => {
                out.push(&body[start..i]);
                start = i + 1;
            }
            _ => (),
        }
        i += 1;
    }
    out.push(&body[start..]);
    out
}

/// Pages without a `Version` field carry the version as a bare
/// second physical line of the template body.
fn version_line(body: &str) -> Option<String> {
    let line = body.lines().nth(1)?;
    let value = line.trim().trim_start_matches('|').trim();
    if value.is_empty() || value.contains('=') {
        return None;
    }
    Some(expand_gm(value))
}

fn expand_gm(version: &str) -> String {
    version
        .split_whitespace()
        .map(|word| {
            if word == GM_SYNONYM.0 {
                GM_SYNONYM.1
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
