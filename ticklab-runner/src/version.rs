//! Version stamping — short git revision written into output names and
//! summary rows so labels are traceable to the code that produced them.

use std::process::Command;

/// Short identifier for the current code revision.
///
/// Falls back to `"dev"` when git or a repository is unavailable, so runs
/// from a deployed binary are still stampable.
pub fn version_tag() -> String {
    git_short_hash().unwrap_or_else(|| "dev".to_string())
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    if hash.is_empty() {
        None
    } else {
        Some(hash.to_string())
    }
}
