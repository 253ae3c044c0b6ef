//! Browser bundles through rolldown.
//!
//! Every entry file is bundled on its own into a single IIFE script, so
//! modules shared between entries are inlined into each bundle instead of
//! being split into shared chunks.

use crate::config::SourceSet;
use crate::error::ScriptError;
use crate::hash::{content_hash, hashed_filename};
use crate::manifest::Manifest;
use crate::mode::Mode;
use crate::sources;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, RawMinifyOptions,
    SourceMapType,
};
use rolldown_common::Output;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions a module inside the scripts tree may have.
pub const MODULE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "tsx"];

/// Inputs and outputs of one script build.
#[derive(Debug, Clone)]
pub struct ScriptJob<'a> {
    pub entries: &'a SourceSet,
    pub out_dir: &'a Path,
    pub manifest_path: &'a Path,
    /// URL prefix bundles are served under, e.g. `/js/`
    pub public_path: &'a str,
    pub hash_length: usize,
    pub root: &'a Path,
}

/// One written bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Entry source file
    pub entry: PathBuf,
    /// Logical name, `<entry>.js`
    pub name: String,
    /// Path written
    pub path: PathBuf,
    pub bytes: u64,
}

/// Result of bundling every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptsOutput {
    pub bundles: Vec<Bundle>,
    /// Every source module that ended up in a bundle
    pub modules: BTreeSet<PathBuf>,
    /// Production only
    pub manifest: Option<Manifest>,
}

struct BundledEntry {
    entry: PathBuf,
    name: String,
    file_name: String,
    code: String,
    modules: Vec<PathBuf>,
}

/// Bundle every entry of `job`, then write the bundles and, in production,
/// the manifest.
///
/// All entries are bundled before anything is written; one failing entry
/// leaves the previous output in place.
pub async fn build_scripts(job: &ScriptJob<'_>, mode: Mode) -> Result<ScriptsOutput, ScriptError> {
    let entries = sources::collect(job.entries)?;
    if entries.is_empty() {
        tracing::debug!(dir = %job.entries.dir.display(), "no script entries");
    }

    let mut bundled = Vec::with_capacity(entries.len());
    for entry in entries {
        bundled.push(bundle_entry(&entry, job, mode).await?);
    }

    write(job, mode, bundled)
}

async fn bundle_entry(
    entry: &Path,
    job: &ScriptJob<'_>,
    mode: Mode,
) -> Result<BundledEntry, ScriptError> {
    let stem = entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    let label = entry.display().to_string();

    let options = BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(stem.clone()),
            import: entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(job.root.to_path_buf()),
        format: Some(OutputFormat::Iife),
        platform: Some(Platform::Browser),
        sourcemap: mode.is_development().then_some(SourceMapType::Inline),
        minify: mode.is_production().then(|| RawMinifyOptions::from(true)),
        ..Default::default()
    };

    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .build()
        .map_err(|e| ScriptError::Bundler {
            entry: label.clone(),
            message: format!("{:?}", e),
        })?;

    let output = bundler.generate().await.map_err(|e| ScriptError::Bundler {
        entry: label.clone(),
        message: format!("{:?}", e),
    })?;

    let chunk = output
        .assets
        .iter()
        .find_map(|asset| match asset {
            Output::Chunk(chunk) if chunk.is_entry => Some(chunk.clone()),
            _ => None,
        })
        .ok_or_else(|| ScriptError::NoEntryChunk(label.clone()))?;

    let code = chunk.code.clone();
    let name = format!("{}.js", stem);
    let file_name = match mode {
        Mode::Development => name.clone(),
        Mode::Production => hashed_filename(&name, &content_hash(code.as_bytes(), job.hash_length)),
    };

    let modules = chunk
        .module_ids
        .iter()
        .map(|id| PathBuf::from(id.to_string()))
        .filter(|path| path.is_absolute())
        .collect();

    tracing::debug!(entry = %label, file = %file_name, bytes = code.len(), "bundled");
    Ok(BundledEntry {
        entry: entry.to_path_buf(),
        name,
        file_name,
        code,
        modules,
    })
}

fn write(
    job: &ScriptJob<'_>,
    mode: Mode,
    bundled: Vec<BundledEntry>,
) -> Result<ScriptsOutput, ScriptError> {
    let mut output = ScriptsOutput::default();
    if bundled.is_empty() {
        return Ok(output);
    }

    fs::create_dir_all(job.out_dir)?;

    let mut manifest = Manifest::new();
    for bundle in bundled {
        let path = job.out_dir.join(&bundle.file_name);
        fs::write(&path, &bundle.code)?;

        let url = format!("{}{}", job.public_path, bundle.file_name);
        manifest.insert(bundle.name.clone(), strip_public_path(&url, job.public_path));

        output.modules.extend(bundle.modules);
        output.bundles.push(Bundle {
            entry: bundle.entry,
            name: bundle.name,
            path,
            bytes: bundle.code.len() as u64,
        });
    }

    if mode.is_production() {
        manifest.save(job.manifest_path)?;
        output.manifest = Some(manifest);
    }

    Ok(output)
}

/// `/js/main-abc.js` with public path `/js/` becomes `main-abc.js`.
fn strip_public_path<'u>(url: &'u str, public_path: &str) -> &'u str {
    url.strip_prefix(public_path).unwrap_or(url)
}

/// The set of files the script watcher reacts to: every module-like file
/// under the entry directory.
pub fn watch_set(entries: &SourceSet) -> SourceSet {
    let mut extensions: Vec<String> = MODULE_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    for ext in &entries.extensions {
        if !extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)) {
            extensions.push(ext.clone());
        }
    }

    SourceSet {
        dir: entries.dir.clone(),
        extensions,
        recursive: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_public_path() {
        assert_eq!(strip_public_path("/js/main-abc.js", "/js/"), "main-abc.js");
        assert_eq!(strip_public_path("main.js", "/js/"), "main.js");
    }

    #[test]
    fn test_watch_set_covers_modules() {
        let entries = SourceSet {
            dir: PathBuf::from("/p/frontend/js"),
            extensions: vec!["js".to_string(), "es6".to_string()],
            recursive: false,
        };
        let set = watch_set(&entries);
        assert!(set.recursive);
        assert!(set.matches(Path::new("/p/frontend/js/lib/util.ts")));
        assert!(set.matches(Path::new("/p/frontend/js/legacy.es6")));
        assert!(!set.matches(Path::new("/p/frontend/js/readme.md")));
    }
}
