use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Sanitize an entry path for extraction under `base`.
///
/// The check is lexical: absolute paths, prefix/root components, and any
/// parent-directory component that would climb above `base` are rejected
/// as unsafe. An entry that normalizes to nothing (empty name, `./`) is
/// invalid.
pub fn sanitize_entry_path<P: AsRef<Path>, B: AsRef<Path>>(
    entry_path: P,
    base: B,
) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    let mut relative = PathBuf::new();
    let mut depth = 0usize;

    for component in entry_path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => {
                relative.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return Err(Error::UnsafePath {
                        entry: entry_path.to_path_buf(),
                        base: base.to_path_buf(),
                    });
                }
                relative.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafePath {
                    entry: entry_path.to_path_buf(),
                    base: base.to_path_buf(),
                });
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidPath);
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved: base.join(relative),
    })
}

/// Sanitize a symlink target so the link cannot point outside `base`.
///
/// The target is resolved relative to the symlink's own location, then
/// checked lexically against `base`. Relative targets with `..` segments
/// are allowed as long as they stay inside.
pub fn sanitize_symlink_target<P: AsRef<Path>, L: AsRef<Path>, B: AsRef<Path>>(
    target: P,
    symlink_location: L,
    base: B,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let symlink_location = symlink_location.as_ref();
    let base = base.as_ref();

    if target.is_absolute() {
        return Err(Error::UnsafePath {
            entry: target.to_path_buf(),
            base: base.to_path_buf(),
        });
    }

    let resolved = symlink_location
        .parent()
        .map(|p| p.join(target))
        .unwrap_or_else(|| target.to_path_buf());

    // Normalize lexically; pops here are legitimate as long as the final
    // path stays under base.
    let mut normalized = PathBuf::new();
    for component in resolved.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    if !normalized.starts_with(base) {
        return Err(Error::UnsafePath {
            entry: target.to_path_buf(),
            base: base.to_path_buf(),
        });
    }

    Ok(normalized)
}
