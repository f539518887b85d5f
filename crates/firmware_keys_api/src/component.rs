//! The fixed table of firmware image component families.

/// Token name suffixes that describe another component's record
/// and are never records themselves.
pub const RESERVED_SUFFIXES: &[&str] = &["key", "iv", "kbag", "model", "model2"];

/// True for token names that only ever feed another component's record.
pub fn is_reserved_token(name: &str) -> bool {
    RESERVED_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// One firmware image component family as published on key pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Lower-case token prefix, e.g. `iboot`.
    pub token: &'static str,

    /// Canonical display identifier, e.g. `iBoot`.
    pub image: &'static str,

    /// Token prefix of the second hardware variant, e.g. `iboot2`.
    pub secondary_token: Option<&'static str>,
}

impl ComponentSpec {
    const fn dual(
        token: &'static str,
        secondary_token: &'static str,
        image: &'static str,
    ) -> Self {
        Self {
            token,
            image,
            secondary_token: Some(secondary_token),
        }
    }
}

/// Component families in output order.
pub static COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec::dual("rootfs", "rootfs2", "RootFS"),
    ComponentSpec::dual("updateramdisk", "updateramdisk2", "UpdateRamdisk"),
    ComponentSpec::dual("restoreramdisk", "restoreramdisk2", "RestoreRamdisk"),
    ComponentSpec::dual("aopfirmware", "aopfirmware2", "AOPFirmware"),
    ComponentSpec::dual("applelogo", "applelogo2", "AppleLogo"),
    ComponentSpec::dual("audiocodecfirmware", "audiocodecfirmware2", "AudioCodecFirmware"),
    ComponentSpec::dual("batterycharging", "batterycharging2", "BatteryCharging"),
    ComponentSpec::dual("batterycharging0", "batterycharging02", "BatteryCharging0"),
    ComponentSpec::dual("batterycharging1", "batterycharging12", "BatteryCharging1"),
    ComponentSpec::dual("batteryfull", "batteryfull2", "BatteryFull"),
    ComponentSpec::dual("batterylow0", "batterylow02", "BatteryLow0"),
    ComponentSpec::dual("batterylow1", "batterylow12", "BatteryLow1"),
    ComponentSpec::dual("devicetree", "devicetree2", "DeviceTree"),
    ComponentSpec::dual("glyphcharging", "glyphcharging2", "GlyphCharging"),
    ComponentSpec::dual("glyphplugin", "glyphplugin2", "GlyphPlugin"),
    ComponentSpec::dual("ibec", "ibec2", "iBEC"),
    ComponentSpec::dual("iboot", "iboot2", "iBoot"),
    ComponentSpec::dual("ibss", "ibss2", "iBSS"),
    ComponentSpec::dual("isp", "isp2", "ISP"),
    ComponentSpec::dual("kernelcache", "kernelcache2", "Kernelcache"),
    ComponentSpec::dual("llb", "llb2", "LLB"),
    ComponentSpec::dual("liquiddetect", "liquiddetect2", "LiquidDetect"),
    ComponentSpec::dual("multitouch", "multitouch2", "Multitouch"),
    ComponentSpec::dual("recoverymode", "recoverymode2", "RecoveryMode"),
    ComponentSpec::dual("sepfirmware", "sepfirmware2", "SEPFirmware"),
    ComponentSpec::dual("basebandfirmware", "basebandfirmware2", "BasebandFirmware"),
];

/// The family a (lower-case) token names as a record, through either
/// its primary or its secondary variant prefix.
pub fn component_for_token(name: &str) -> Option<&'static ComponentSpec> {
    COMPONENTS
        .iter()
        .find(|c| c.token == name || c.secondary_token == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_tokens_are_lowercase_and_unique() {
        let mut seen = HashSet::new();
        for c in COMPONENTS {
            assert_eq!(c.token, c.token.to_lowercase());
            assert_eq!(c.token, c.image.to_lowercase());
            assert!(seen.insert(c.token), "duplicate token {}", c.token);
            if let Some(s) = c.secondary_token {
                assert!(s.starts_with(c.token));
                assert!(seen.insert(s), "duplicate token {}", s);
            }
        }
    }

    #[test]
    fn no_family_is_a_reserved_token() {
        for c in COMPONENTS {
            assert!(!is_reserved_token(c.token), "{}", c.token);
        }
        assert!(is_reserved_token("ibootkey"));
        assert!(is_reserved_token("iboot2iv"));
        assert!(is_reserved_token("model2"));
    }

    #[test]
    fn every_family_has_a_secondary_variant() {
        for c in COMPONENTS {
            assert!(c.secondary_token.is_some(), "{}", c.image);
        }
    }

    #[test]
    fn lookup_by_token() {
        let image = |name| component_for_token(name).map(|c| c.image);
        assert_eq!(Some("iBoot"), image("iboot"));
        assert_eq!(Some("iBoot"), image("iboot2"));
        assert_eq!(Some("Multitouch"), image("multitouch2"));
        assert_eq!(None, image("ibootiv"));
        assert_eq!(None, image("iBoot"));
    }
}
