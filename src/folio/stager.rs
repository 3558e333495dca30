//! # Asset Stager
//!
//! Staging is split from committing so an abandoned form leaves nothing behind:
//!
//! 1. [`validate`] checks that the picked or dropped file exists and has an
//!    accepted image extension. Nothing is copied.
//! 2. [`derive_destination_name`] turns the record title into a file name that
//!    is safe on disk and in a URL (`"Sunset Over the Bay!!"` + `.JPG` →
//!    `sunset-over-the-bay.JPG`). The source extension keeps its case.
//! 3. [`resolve_collision`] picks a free name in the asset directory according
//!    to the [`CollisionPolicy`].
//! 4. [`commit`] copies the file and returns the public URL to embed in the
//!    record.
//!
//! The asset directory is flat and shared by every content kind. Chess assets
//! carry a `chess-` prefix; the other kinds can still collide with each other,
//! which is what the collision policy is for.

use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when the derived asset name already exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `-2`, `-3`, ... to the stem until the name is free.
    #[default]
    Suffix,
    /// Reuse the name and replace the existing file.
    Overwrite,
}

/// A validated source file waiting to be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAsset {
    source_path: PathBuf,
    extension: String,
}

impl StagedAsset {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Extension with its leading dot, case preserved (e.g. `.JPG`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Validate a candidate asset without touching the asset directory.
///
/// `accepted` holds lower-cased extensions without the dot.
pub fn validate<P: AsRef<Path>>(path: P, accepted: &[String]) -> Result<StagedAsset> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FolioError::NotFound(path.to_path_buf()));
    }

    let raw_ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lowered = raw_ext.to_ascii_lowercase();

    if raw_ext.is_empty() || !accepted.iter().any(|ext| *ext == lowered) {
        return Err(FolioError::UnsupportedType {
            path: path.to_path_buf(),
            extension: raw_ext,
        });
    }

    Ok(StagedAsset {
        source_path: path.to_path_buf(),
        extension: format!(".{}", raw_ext),
    })
}

/// Reduce a title to lower-case ASCII alphanumerics and hyphens.
///
/// Returns an empty string when nothing survives.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    kept.trim().replace(' ', "-").to_ascii_lowercase()
}

/// Build the destination file name for an asset.
pub fn derive_destination_name(title: &str, extension: &str, prefix: &str) -> Result<String> {
    let stem = sanitize_title(title);
    if stem.is_empty() {
        return Err(FolioError::EmptyName(title.to_string()));
    }
    Ok(format!("{}{}{}", prefix, stem, extension))
}

/// Pick the name the asset will actually be written under.
pub fn resolve_collision(dir: &Path, name: &str, policy: CollisionPolicy) -> String {
    if policy == CollisionPolicy::Overwrite || !dir.join(name).exists() {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    };

    let mut counter = 2;
    loop {
        let candidate = format!("{}-{}{}", stem, counter, ext);
        if !dir.join(&candidate).exists() {
            tracing::warn!(
                taken = name,
                chosen = candidate.as_str(),
                "asset name already in use, renaming"
            );
            return candidate;
        }
        counter += 1;
    }
}

/// Copy a staged asset into the asset directory.
///
/// `public_dir` is the URL prefix the site serves the directory under.
/// Returns `"<public_dir>/<name>"`.
pub fn commit(
    staged: &StagedAsset,
    asset_dir: &Path,
    public_dir: &str,
    name: &str,
) -> Result<String> {
    let dest = asset_dir.join(name);
    let copy_failed = |source| FolioError::CopyFailed {
        from: staged.source_path.clone(),
        to: dest.clone(),
        source,
    };

    fs::create_dir_all(asset_dir).map_err(copy_failed)?;
    let bytes = fs::copy(&staged.source_path, &dest).map_err(copy_failed)?;

    tracing::info!(
        source = %staged.source_path.display(),
        dest = %dest.display(),
        bytes,
        "asset copied"
    );

    Ok(format!("{}/{}", public_dir.trim_end_matches('/'), name))
}

/// Split a drag-and-drop payload into paths.
///
/// Drop targets deliver a Tcl list: paths are separated by whitespace and a
/// path containing spaces is wrapped in braces, e.g.
/// `{/home/me/my photo.jpg} /home/me/other.png`.
pub fn parse_drop_payload(data: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut chars = data.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut item = String::new();
        if c == '{' {
            chars.next();
            let mut depth = 1;
            for c in chars.by_ref() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                item.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                chars.next();
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                } else {
                    item.push(c);
                }
            }
        }

        if !item.is_empty() {
            paths.push(PathBuf::from(item));
        }
    }

    paths
}

/// Title suggestion from a file name: `golden-gate_at_dusk.jpg` → `Golden Gate At Dusk`.
pub fn suggest_title<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut title = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for c in stem.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if at_word_start {
                title.extend(c.to_uppercase());
            } else {
                title.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            title.push(c);
            at_word_start = true;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn accepted() -> Vec<String> {
        ["jpg", "jpeg", "png", "webp", "gif"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn derive_strips_punctuation_and_keeps_extension_case() {
        let name = derive_destination_name("Sunset Over the Bay!!", ".JPG", "").unwrap();
        assert_eq!(name, "sunset-over-the-bay.JPG");
    }

    #[test]
    fn derive_applies_prefix() {
        let name = derive_destination_name("My Best Game", ".png", "chess-").unwrap();
        assert_eq!(name, "chess-my-best-game.png");
    }

    #[test]
    fn derive_rejects_title_without_usable_characters() {
        assert!(matches!(
            derive_destination_name("!!! ???", ".jpg", ""),
            Err(FolioError::EmptyName(_))
        ));
    }

    #[test]
    fn sanitize_is_idempotent_on_safe_titles() {
        for title in ["plain", "two words", "already-hyphenated", "Mixed Case 42"] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once);
        }
    }

    #[test]
    fn sanitize_keeps_only_safe_characters() {
        let titles = [
            "Rook & Pawn: the endgame?",
            "C'est la vie / 2024",
            "émoji 🎉 party #1",
            "tabs\tand\nnewlines",
        ];
        for title in titles {
            let safe = sanitize_title(title);
            assert!(
                safe.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected character in {:?}",
                safe
            );
        }
    }

    #[test]
    fn sanitize_keeps_inner_space_runs_as_hyphen_runs() {
        assert_eq!(sanitize_title("  a  b  "), "a--b");
    }

    #[test]
    fn validate_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.jpg");
        assert!(matches!(
            validate(&path, &accepted()),
            Err(FolioError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn validate_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            validate(dir.path(), &accepted()),
            Err(FolioError::NotFound(_))
        ));
    }

    #[test]
    fn validate_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hi").unwrap();
        assert!(matches!(
            validate(&path, &accepted()),
            Err(FolioError::UnsupportedType { extension, .. }) if extension == "txt"
        ));
    }

    #[test]
    fn validate_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README");
        fs::write(&path, "hi").unwrap();
        assert!(matches!(
            validate(&path, &accepted()),
            Err(FolioError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn validate_is_case_insensitive_and_preserves_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("IMG_0042.JPG");
        fs::write(&path, b"\xff\xd8").unwrap();

        let staged = validate(&path, &accepted()).unwrap();
        assert_eq!(staged.extension(), ".JPG");
        assert_eq!(staged.file_name(), "IMG_0042.JPG");
    }

    #[test]
    fn resolve_collision_suffixes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dunes.jpg"), "a").unwrap();
        fs::write(dir.path().join("dunes-2.jpg"), "b").unwrap();

        assert_eq!(
            resolve_collision(dir.path(), "dunes.jpg", CollisionPolicy::Suffix),
            "dunes-3.jpg"
        );
        assert_eq!(
            resolve_collision(dir.path(), "fresh.jpg", CollisionPolicy::Suffix),
            "fresh.jpg"
        );
    }

    #[test]
    fn resolve_collision_overwrite_keeps_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dunes.jpg"), "a").unwrap();
        assert_eq!(
            resolve_collision(dir.path(), "dunes.jpg", CollisionPolicy::Overwrite),
            "dunes.jpg"
        );
    }

    #[test]
    fn commit_copies_and_returns_public_url() {
        let src_dir = TempDir::new().unwrap();
        let site = TempDir::new().unwrap();
        let src = src_dir.path().join("raw.png");
        fs::write(&src, b"png-bytes").unwrap();

        let staged = validate(&src, &accepted()).unwrap();
        let asset_dir = site.path().join("images");
        let url = commit(&staged, &asset_dir, "images", "cover.png").unwrap();

        assert_eq!(url, "images/cover.png");
        assert_eq!(fs::read(asset_dir.join("cover.png")).unwrap(), b"png-bytes");
    }

    #[test]
    fn commit_after_source_removed_fails() {
        let src_dir = TempDir::new().unwrap();
        let site = TempDir::new().unwrap();
        let src = src_dir.path().join("raw.png");
        fs::write(&src, b"png-bytes").unwrap();

        let staged = validate(&src, &accepted()).unwrap();
        fs::remove_file(&src).unwrap();

        let result = commit(&staged, &site.path().join("images"), "images", "cover.png");
        assert!(matches!(result, Err(FolioError::CopyFailed { .. })));
    }

    #[test]
    fn drop_payload_with_braces_and_plain_paths() {
        let paths = parse_drop_payload("{/home/me/my photo.jpg} /home/me/other.png");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/me/my photo.jpg"),
                PathBuf::from("/home/me/other.png")
            ]
        );
    }

    #[test]
    fn drop_payload_with_escaped_space() {
        let paths = parse_drop_payload(r"/tmp/a\ b.jpg");
        assert_eq!(paths, vec![PathBuf::from("/tmp/a b.jpg")]);
    }

    #[test]
    fn drop_payload_empty() {
        assert!(parse_drop_payload("   ").is_empty());
    }

    #[test]
    fn suggest_title_from_file_name() {
        assert_eq!(
            suggest_title("/photos/golden-gate_at_DUSK.jpg"),
            "Golden Gate At Dusk"
        );
    }
}
