use serde::Serialize;

/// Engine build identification read from the library's version globals.
#[derive(Clone, Debug, Serialize)]
pub struct VersionInfo {
    /// Core engine version, e.g. "1.2.0".
    pub version: String,
    /// Build timestamp baked into the library.
    pub build_date: String,
    pub copyright: String,
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "core version: {}; build date: {}; {}",
            self.version, self.build_date, self.copyright
        )
    }
}
