use one_err::OneErr;

/// Firmware keys result type.
pub type KeysResult<T> = Result<T, OneErr>;

/// The domain failures this crate reports.
/// Each kind is carried as the `str_kind()` of a [OneErr],
/// so errors stay serializable while remaining matchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeysErrorKind {
    /// Mandatory page metadata (device / build / codename) is absent,
    /// or the page does not describe the requested device and build.
    MissingRequiredField,

    /// The supplied board config matches neither published model.
    InvalidBoardConfig,

    /// The page publishes two hardware variants and no board config
    /// was supplied to choose between them.
    AmbiguousVariant,

    /// The page source holds no page for the requested device and build.
    PageNotFound,
}

impl KeysErrorKind {
    const ALL: [KeysErrorKind; 4] = [
        KeysErrorKind::MissingRequiredField,
        KeysErrorKind::InvalidBoardConfig,
        KeysErrorKind::AmbiguousVariant,
        KeysErrorKind::PageNotFound,
    ];

    /// The string kind stored in the [OneErr].
    pub fn as_str(&self) -> &'static str {
        match self {
            KeysErrorKind::MissingRequiredField => "MissingRequiredField",
            KeysErrorKind::InvalidBoardConfig => "InvalidBoardConfig",
            KeysErrorKind::AmbiguousVariant => "AmbiguousVariant",
            KeysErrorKind::PageNotFound => "PageNotFound",
        }
    }

    /// Build an error of this kind with a human readable message.
    pub fn err<M: std::fmt::Display>(self, message: M) -> OneErr {
        OneErr::with_message(self.as_str(), message.to_string())
    }

    /// Classify an error produced by this crate.
    /// Returns `None` for io / serialization / other errors.
    pub fn of(err: &OneErr) -> Option<Self> {
        let kind = err.str_kind();
        Self::ALL.iter().copied().find(|k| k.as_str() == kind)
    }
}

impl std::fmt::Display for KeysErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_one_err() {
        for kind in KeysErrorKind::ALL {
            let err = kind.err("test");
            assert_eq!(kind.as_str(), err.str_kind());
            assert_eq!(Some(kind), KeysErrorKind::of(&err));
        }
    }

    #[test]
    fn foreign_errors_are_unclassified() {
        let err = OneErr::new(std::io::Error::from(
            std::io::ErrorKind::NotFound,
        ));
        assert_eq!(None, KeysErrorKind::of(&err));
    }
}
