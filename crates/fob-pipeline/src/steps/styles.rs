//! Stylesheet compilation through lightningcss.
//!
//! ```text
//! entry → bundle @imports → rewrite url()s → [minify + hash] → print → write
//! ```
//!
//! The whole stylesheet is compiled in memory before anything touches the
//! output directory, so a compile error leaves the previous output intact.

use crate::error::StyleError;
use crate::hash::{content_hash, hashed_filename};
use crate::manifest::Manifest;
use crate::mode::Mode;
use lightningcss::{
    bundler::{Bundler, FileProvider},
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
    values::url::Url,
    visit_types,
    visitor::{Visit, VisitTypes, Visitor},
};
use parcel_sourcemap::SourceMap;
use path_clean::PathClean;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Where one stylesheet build reads from and writes to.
#[derive(Debug, Clone)]
pub struct StyleJob<'a> {
    /// Entry stylesheet
    pub entry: &'a Path,
    /// Directory receiving the compiled CSS (and map)
    pub out_dir: &'a Path,
    /// Style manifest, written in production
    pub manifest_path: &'a Path,
    pub hash_length: usize,
    /// Project root used for source map paths
    pub root: &'a Path,
}

/// Files produced by a successful stylesheet build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOutput {
    pub css_path: PathBuf,
    pub map_path: Option<PathBuf>,
    /// Rename record, production only
    pub manifest: Option<Manifest>,
    pub bytes_written: u64,
}

/// A compiled stylesheet that has not been written yet.
#[derive(Debug, Clone)]
struct Compiled {
    file_name: String,
    code: String,
    map: Option<(String, String)>,
    manifest: Option<Manifest>,
}

/// Compile the stylesheet named by `job` and write the results.
///
/// Returns `Ok(None)` when the entry does not exist.
pub fn compile_styles(job: &StyleJob<'_>, mode: Mode) -> Result<Option<StyleOutput>, StyleError> {
    if !job.entry.is_file() {
        tracing::warn!(entry = %job.entry.display(), "stylesheet entry not found, skipping");
        return Ok(None);
    }

    let compiled = compile(job, mode)?;
    write(job, compiled).map(Some)
}

fn compile(job: &StyleJob<'_>, mode: Mode) -> Result<Compiled, StyleError> {
    let name = output_name(job.entry);
    let entry_dir = job.entry.parent().unwrap_or(job.root);
    let root = job.root.to_string_lossy().into_owned();

    let mut source_map = mode.is_development().then(|| SourceMap::new(&root));

    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, source_map.as_mut(), ParserOptions::default());
    let mut stylesheet = bundler
        .bundle(job.entry)
        .map_err(|e| StyleError::Compile {
            message: e.to_string(),
        })?;
    drop(bundler);

    rewrite_urls(&mut stylesheet, entry_dir)?;

    if mode.is_production() {
        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| StyleError::Minify(e.to_string()))?;
    }

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: mode.is_production(),
            source_map: source_map.as_mut(),
            project_root: Some(&root),
            ..Default::default()
        })
        .map_err(|e| StyleError::Print(e.to_string()))?;

    match mode {
        Mode::Development => {
            let map_name = format!("{}.map", name);
            let map_json = source_map
                .as_mut()
                .map(|sm| sm.to_json(None))
                .transpose()
                .map_err(|e| StyleError::SourceMap(e.to_string()))?
                .unwrap_or_default();

            let code = format!("{}\n/*# sourceMappingURL={} */\n", printed.code, map_name);
            Ok(Compiled {
                file_name: name,
                code,
                map: Some((map_name, map_json)),
                manifest: None,
            })
        }
        Mode::Production => {
            let hash = content_hash(printed.code.as_bytes(), job.hash_length);
            let hashed = hashed_filename(&name, &hash);

            let mut manifest = Manifest::new();
            manifest.insert(name, hashed.clone());

            Ok(Compiled {
                file_name: hashed,
                code: printed.code,
                map: None,
                manifest: Some(manifest),
            })
        }
    }
}

fn write(job: &StyleJob<'_>, compiled: Compiled) -> Result<StyleOutput, StyleError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| StyleError::Write { path, source }
    };

    fs::create_dir_all(job.out_dir).map_err(write_err(job.out_dir))?;

    let css_path = job.out_dir.join(&compiled.file_name);
    fs::write(&css_path, &compiled.code).map_err(write_err(&css_path))?;
    let mut bytes_written = compiled.code.len() as u64;

    let map_path = match &compiled.map {
        Some((map_name, json)) => {
            let path = job.out_dir.join(map_name);
            fs::write(&path, json).map_err(write_err(&path))?;
            bytes_written += json.len() as u64;
            Some(path)
        }
        None => None,
    };

    if let Some(manifest) = &compiled.manifest {
        manifest
            .save(job.manifest_path)
            .map_err(write_err(job.manifest_path))?;
    }

    tracing::debug!(css = %css_path.display(), bytes = bytes_written, "wrote stylesheet");
    Ok(StyleOutput {
        css_path,
        map_path,
        manifest: compiled.manifest,
        bytes_written,
    })
}

/// `index.styl` and `index.css` both compile to `index.css`.
fn output_name(entry: &Path) -> String {
    let stem = entry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    format!("{}.css", stem)
}

fn rewrite_urls(
    stylesheet: &mut StyleSheet<'_>,
    entry_dir: &Path,
) -> Result<(), StyleError> {
    let sources: Vec<PathBuf> = stylesheet.sources.iter().map(PathBuf::from).collect();
    let mut rewriter = UrlRewriter {
        sources: &sources,
        entry_dir,
    };
    stylesheet.visit(&mut rewriter)
}

/// Re-bases relative `url()`s from the file that contains them onto the
/// entry directory, failing on targets that do not exist.
struct UrlRewriter<'a> {
    sources: &'a [PathBuf],
    entry_dir: &'a Path,
}

impl<'i> Visitor<'i> for UrlRewriter<'_> {
    type Error = StyleError;

    fn visit_types(&self) -> VisitTypes {
        visit_types!(URLS)
    }

    fn visit_url(&mut self, url: &mut Url<'i>) -> Result<(), Self::Error> {
        if !is_relative_url(&url.url) {
            return Ok(());
        }

        let Some(file) = self.sources.get(url.loc.source_index as usize) else {
            return Ok(());
        };
        let file_dir = file.parent().unwrap_or(self.entry_dir);

        let (path_part, suffix) = split_url_suffix(&url.url);
        let target = file_dir.join(path_part).clean();
        if !target.exists() {
            return Err(StyleError::UnresolvedUrl {
                url: url.url.to_string(),
                file: file.clone(),
            });
        }

        if file_dir != self.entry_dir {
            let rebased = relative_to(&target, self.entry_dir);
            url.url = format!("{}{}", rebased, suffix).into();
        }
        Ok(())
    }
}

fn is_relative_url(url: &str) -> bool {
    !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url.contains(':'))
}

/// Split `img/a.svg?v=1#frag` into `("img/a.svg", "?v=1#frag")`.
fn split_url_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(index) => url.split_at(index),
        None => (url, ""),
    }
}

/// Relative path from `base` to `target` with `/` separators. Both paths
/// must be absolute and clean.
fn relative_to(target: &Path, base: &Path) -> String {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), base.len() - common).collect();
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}
