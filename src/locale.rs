//! Locale translation-file store: `message.<locale>.json` load/save,
//! backups, source-text rewrites, and propagation to other locales.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::StubgenError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// One parsed locale file.
///
/// Only the `translations` object is interpreted; every other metadata
/// field is carried through a load/save round trip verbatim.
pub struct LocaleFile {
    #[serde(default)]
    translations: BTreeMap<String, String>,
    #[serde(flatten)]
    extra: JsonMap<String, JsonValue>,
}

impl LocaleFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StubgenError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StubgenError::LocaleError(format!(
                "failed to read locale file '{}': {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            StubgenError::LocaleError(format!(
                "invalid locale file '{}': {e}",
                path.display()
            ))
        })
    }

    /// Saves as pretty-printed JSON with a trailing newline.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StubgenError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            StubgenError::SerializationError(format!("failed to serialize locale file: {e}"))
        })?;
        fs::write(path, json + "\n").map_err(|e| {
            StubgenError::LocaleError(format!(
                "failed to write locale file '{}': {e}",
                path.display()
            ))
        })
    }

    /// The `translations` mapping, key-sorted. A missing field reads as
    /// empty rather than failing.
    pub fn translations(&self) -> &BTreeMap<String, String> {
        &self.translations
    }

    pub fn translations_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.translations
    }

    pub fn set_translations(&mut self, translations: BTreeMap<String, String>) {
        self.translations = translations;
    }
}

/// Path of one locale file under the locales directory.
pub fn locale_path(dir: impl AsRef<Path>, locale: &str) -> PathBuf {
    dir.as_ref().join(format!("message.{locale}.json"))
}

/// Copies `<path>` to `<path>.bak` before mutation. A missing original is
/// not an error (there is nothing to back up).
pub fn backup_file(path: impl AsRef<Path>) -> Result<Option<PathBuf>, StubgenError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    let backup = PathBuf::from(backup);
    fs::copy(path, &backup).map_err(|e| {
        StubgenError::LocaleError(format!("failed to back up '{}': {e}", path.display()))
    })?;
    Ok(Some(backup))
}

#[derive(Debug, Clone)]
/// One source-text correction applied during the rewrite phase.
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Applies rewrite rules in order to every translation value, returning the
/// number of replaced occurrences per rule (keyed by the `from` text).
pub fn apply_rewrites(
    translations: &mut BTreeMap<String, String>,
    rules: &[RewriteRule],
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rule in rules {
        counts.entry(rule.from.clone()).or_insert(0);
    }

    for value in translations.values_mut() {
        for rule in rules {
            let occurrences = value.matches(&rule.from).count();
            if occurrences > 0 {
                *value = value.replace(&rule.from, &rule.to);
                *counts.entry(rule.from.clone()).or_insert(0) += occurrences;
            }
        }
    }
    counts
}

/// Rewrites the source locale file in place (with a backup) and returns the
/// corrected translations plus per-rule replacement counts.
pub fn rewrite_source(
    dir: impl AsRef<Path>,
    source_locale: &str,
    rules: &[RewriteRule],
) -> Result<(BTreeMap<String, String>, BTreeMap<String, usize>), StubgenError> {
    let path = locale_path(&dir, source_locale);
    backup_file(&path)?;

    let mut file = LocaleFile::load(&path)?;
    let counts = apply_rewrites(file.translations_mut(), rules);
    file.save(&path)?;

    Ok((file.translations().clone(), counts))
}

#[derive(Debug, Default)]
/// Result of propagating the source translations to target locales.
pub struct PropagateOutcome {
    pub updated: Vec<String>,
    pub warnings: Vec<String>,
}

/// Overwrites each target locale's `translations` with the given source
/// translations, preserving each file's other metadata. Missing target
/// files are skipped with a warning, not fatal.
pub fn propagate_source(
    dir: impl AsRef<Path>,
    source: &BTreeMap<String, String>,
    targets: &[String],
) -> Result<PropagateOutcome, StubgenError> {
    let mut outcome = PropagateOutcome::default();

    for locale in targets {
        let path = locale_path(&dir, locale);
        if !path.exists() {
            outcome
                .warnings
                .push(format!("skipping '{locale}': file not found"));
            continue;
        }

        backup_file(&path)?;
        let mut file = LocaleFile::load(&path)?;
        file.set_translations(source.clone());
        file.save(&path)?;
        outcome.updated.push(locale.clone());
    }

    Ok(outcome)
}
