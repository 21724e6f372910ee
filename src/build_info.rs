//! Build-time identity.

/// Version, commit and date of the running binary.
///
/// The commit sha and build date are injected by the build script through
/// environment variables; local builds fall back to "unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub commit_sha: String,
    pub date: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit_sha: option_env!("REDIS_EXPORTER_BUILD_SHA")
                .unwrap_or("unknown")
                .to_string(),
            date: option_env!("REDIS_EXPORTER_BUILD_DATE")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}
