//! Local directory bootstrap — the fixed data tree every run expects.

use std::path::{Path, PathBuf};

const ENVIRONMENTS: [&str; 2] = ["production", "dummy"];
const SUBDIRS: [&str; 3] = ["outcome_data", "targets", "raw_true_fx"];

/// Creates the data tree under `base_dir`:
/// `{production,dummy}/{outcome_data,targets,raw_true_fx}`.
///
/// Idempotent: existing directories are left as they are. Returns every
/// directory path that is now guaranteed to exist.
pub fn create_local_directories(base_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(ENVIRONMENTS.len() * SUBDIRS.len());
    for environment in ENVIRONMENTS {
        for subdir in SUBDIRS {
            let dir = base_dir.join(environment).join(subdir);
            std::fs::create_dir_all(&dir)?;
            log::debug!("ensured directory {}", dir.display());
            created.push(dir);
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_full_tree() {
        let base = tempfile::tempdir().unwrap();
        let created = create_local_directories(base.path()).unwrap();
        assert_eq!(created.len(), 6);
        assert!(base.path().join("production/targets").is_dir());
        assert!(base.path().join("production/outcome_data").is_dir());
        assert!(base.path().join("production/raw_true_fx").is_dir());
        assert!(base.path().join("dummy/targets").is_dir());
    }

    #[test]
    fn is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        create_local_directories(base.path()).unwrap();
        create_local_directories(base.path()).unwrap();
        assert!(base.path().join("dummy/raw_true_fx").is_dir());
    }
}
