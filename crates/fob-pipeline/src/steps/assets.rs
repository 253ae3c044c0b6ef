use crate::config::SourceSet;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::mode::Mode;
use crate::steps::copy::{copy_if_newer, copy_with, CopyCache, CopyReport};
use std::path::Path;

/// Files whose contents may reference stylesheet names.
pub const TEXT_EXTENSIONS: &[&str] = &["html", "htm", "css", "js", "hbs", "json", "svg", "txt"];

/// Copy the static assets into the output root.
///
/// In production, text files first have every style manifest key replaced
/// with its hashed name. A missing manifest rewrites nothing.
pub fn copy_assets(
    set: &SourceSet,
    out_dir: &Path,
    style_manifest: &Path,
    mode: Mode,
    cache: &CopyCache,
) -> Result<CopyReport> {
    if mode.is_development() {
        return copy_if_newer(set, out_dir, cache);
    }

    let manifest = Manifest::load_or_default(style_manifest)?;
    if manifest.is_empty() {
        tracing::debug!(manifest = %style_manifest.display(), "no style manifest, copying as-is");
        return copy_if_newer(set, out_dir, cache);
    }

    copy_with(set, out_dir, cache, |path, bytes| {
        if !is_text(path) {
            return bytes;
        }
        match String::from_utf8(bytes) {
            Ok(text) => manifest.rewrite_references(&text).into_bytes(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "not valid UTF-8, copied without rewriting stylesheet references"
                );
                e.into_bytes()
            }
        }
    })
}

fn is_text(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
}
