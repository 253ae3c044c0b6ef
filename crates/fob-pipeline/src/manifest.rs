//! Rename manifests written in production builds.
//!
//! A manifest is a flat JSON object mapping a logical asset name to the
//! content-hashed filename that was actually written, e.g.
//! `{"index.css": "index-3f9a1c0b2e.css"}`. Keys are kept sorted so identical
//! builds produce identical files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest, treating a missing file as empty.
    pub fn load_or_default(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Write the manifest as pretty JSON, creating parent directories.
    ///
    /// The file is replaced atomically (temp file, then rename), so a
    /// concurrent [`load_or_default`](Self::load_or_default) sees either the
    /// old or the new manifest, never a truncated one.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)
    }

    pub fn insert(&mut self, original: impl Into<String>, hashed: impl Into<String>) {
        self.entries.insert(original.into(), hashed.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every reference to an original name with its hashed name.
    ///
    /// Longer names are substituted first so `app.css` never clobbers part
    /// of `vendor/app.css`.
    pub fn rewrite_references(&self, content: &str) -> String {
        if self.entries.is_empty() {
            return content.to_string();
        }

        let mut pairs: Vec<(&str, &str)> = self.iter().collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        // Replace through placeholders so a hashed name is never rewritten
        // again by a shorter key that happens to be its substring.
        let mut out = content.to_string();
        for (index, (original, _)) in pairs.iter().enumerate() {
            out = out.replace(original, &placeholder(index));
        }
        for (index, (_, hashed)) in pairs.iter().enumerate() {
            out = out.replace(&placeholder(index), hashed);
        }
        out
    }
}

fn placeholder(index: usize) -> String {
    format!("\u{0}fob-manifest-{}\u{0}", index)
}
