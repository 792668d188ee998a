//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "BTAP_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `BTAP_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
///
/// # Example
///
/// ```rust,ignore
/// let root = btap_standards::standards_root();
/// let (data, _) = StandardsData::verify_and_load(&root)?;
/// ```
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
