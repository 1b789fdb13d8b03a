//! Translation service client, retry policy, and the sequential
//! locale-batch runner.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::error::StubgenError;
use crate::locale::{
    backup_file, locale_path, propagate_source, rewrite_source, LocaleFile, PropagateOutcome,
    RewriteRule,
};

/// Locale code to provider language code. Identity for most locales.
const LOCALE_LANGS: &[(&str, &str)] = &[
    ("en", "en"),
    ("ar", "ar"),
    ("fa", "fa"),
    ("fr", "fr"),
    ("it", "it"),
    ("ru", "ru"),
    ("sk", "sk"),
    ("sp", "es"),
    ("tr", "tr"),
    ("zh", "zh-cn"),
];

/// Every locale the batch tool maintains besides the source locale.
pub const ALL_LOCALES: &[&str] = &["ar", "fa", "fr", "it", "ru", "sk", "sp", "tr", "zh"];

/// Maps a locale code to the translation provider's language code.
pub fn provider_lang(locale: &str) -> Result<&'static str, StubgenError> {
    LOCALE_LANGS
        .iter()
        .find(|(code, _)| *code == locale)
        .map(|(_, lang)| *lang)
        .ok_or_else(|| StubgenError::LocaleError(format!("unknown locale '{locale}'")))
}

/// Seam for the external translation service, so batch logic can be tested
/// against in-memory implementations.
pub trait Translator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, StubgenError>;
}

/// HTTP-backed translator posting `{q, source, target, format}` and reading
/// `{translatedText}` back, the LibreTranslate wire shape.
pub struct HttpTranslator {
    endpoint: String,
    source_lang: String,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, source_lang: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            source_lang: source_lang.into(),
        }
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, StubgenError> {
        let payload = serde_json::json!({
            "q": text,
            "source": self.source_lang,
            "target": target_lang,
            "format": "text",
        });
        let body = serde_json::to_string(&payload).map_err(|e| {
            StubgenError::SerializationError(format!("failed to encode request: {e}"))
        })?;

        let response = ureq::post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .send(body.as_str())
            .map_err(|e| {
                StubgenError::TranslationError(format!(
                    "HTTP request to '{}' failed: {e}",
                    self.endpoint
                ))
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| {
                StubgenError::TranslationError(format!("failed to read response body: {e}"))
            })?;

        let value: JsonValue = serde_json::from_str(&response).map_err(|e| {
            StubgenError::TranslationError(format!("invalid response JSON: {e}"))
        })?;
        value
            .get("translatedText")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| {
                StubgenError::TranslationError(
                    "response is missing 'translatedText'".to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, Copy)]
/// Bounded retries with linearly increasing backoff: the wait before the
/// next attempt is `attempt * base_wait`, attempts numbered from 1.
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_wait: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn wait(&self, attempt: u32) -> Duration {
        self.base_wait * attempt
    }
}

/// Calls the translator up to `policy.max_attempts` times, sleeping the
/// linear backoff between attempts. Exhaustion returns the last error.
pub fn translate_with_retry(
    translator: &dyn Translator,
    text: &str,
    target_lang: &str,
    policy: &RetryPolicy,
) -> Result<String, StubgenError> {
    let mut attempt = 1;
    loop {
        match translator.translate(text, target_lang) {
            Ok(translated) => return Ok(translated),
            Err(_) if attempt < policy.max_attempts => {
                thread::sleep(policy.wait(attempt));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[derive(Debug, Clone)]
/// Per-locale translation result: entries kept in the source language after
/// exhausting retries count under `failed`.
pub struct LocaleOutcome {
    pub locale: String,
    pub total: usize,
    pub translated: usize,
    pub failed: usize,
}

/// Translates one locale file in place, strictly sequentially and in key
/// order, with a fixed inter-call delay.
///
/// An entry whose retries are exhausted keeps its source text; the batch is
/// never aborted for a per-entry failure. The file is saved once, after the
/// whole pass.
pub fn translate_locale(
    dir: impl AsRef<Path>,
    locale: &str,
    translator: &dyn Translator,
    policy: &RetryPolicy,
    delay: Duration,
) -> Result<LocaleOutcome, StubgenError> {
    let target_lang = provider_lang(locale)?;
    let path = locale_path(&dir, locale);
    if !path.exists() {
        return Err(StubgenError::LocaleError(format!(
            "locale file not found: '{}'",
            path.display()
        )));
    }

    backup_file(&path)?;
    let mut file = LocaleFile::load(&path)?;

    let total = file.translations().len();
    let mut translated = 0usize;
    let mut failed = 0usize;

    for value in file.translations_mut().values_mut() {
        match translate_with_retry(translator, value, target_lang, policy) {
            Ok(text) => {
                *value = text;
                translated += 1;
            }
            Err(_) => {
                // Keep the source text when translation fails.
                failed += 1;
            }
        }
        thread::sleep(delay);
    }

    file.save(&path)?;

    Ok(LocaleOutcome {
        locale: locale.to_string(),
        total,
        translated,
        failed,
    })
}

#[derive(Debug, Clone)]
/// Options for one batch run, all paths explicit.
pub struct BatchOptions {
    pub dir: PathBuf,
    pub source_locale: String,
    /// Phase-1 corrections applied to the source locale.
    pub rules: Vec<RewriteRule>,
    /// Phase-2 targets receiving the corrected source text.
    pub targets: Vec<String>,
    /// Phase-3 selection; empty skips translation entirely.
    pub translate: Vec<String>,
    pub delay: Duration,
    pub skip_rewrite: bool,
    pub skip_propagate: bool,
    pub retry: RetryPolicy,
}

impl BatchOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            source_locale: "en".to_string(),
            rules: Vec::new(),
            targets: ALL_LOCALES.iter().map(|l| (*l).to_string()).collect(),
            translate: Vec::new(),
            delay: Duration::from_millis(200),
            skip_rewrite: false,
            skip_propagate: false,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Default)]
/// Everything a batch run did, for the caller to print.
pub struct BatchSummary {
    pub rewrite_counts: BTreeMap<String, usize>,
    pub propagated: Option<PropagateOutcome>,
    pub outcomes: Vec<LocaleOutcome>,
    pub warnings: Vec<String>,
}

/// Runs the three batch phases in order: rewrite the source locale,
/// propagate it to all targets, translate the selected locales.
///
/// A locale that fails wholesale (missing file, unknown code) is recorded
/// as a warning and the remaining locales still run.
pub fn run_batch(
    options: &BatchOptions,
    translator: &dyn Translator,
) -> Result<BatchSummary, StubgenError> {
    let mut summary = BatchSummary::default();

    let source = if options.skip_rewrite {
        let path = locale_path(&options.dir, &options.source_locale);
        LocaleFile::load(&path)?.translations().clone()
    } else {
        let (translations, counts) =
            rewrite_source(&options.dir, &options.source_locale, &options.rules)?;
        summary.rewrite_counts = counts;
        translations
    };

    if !options.skip_propagate {
        summary.propagated = Some(propagate_source(&options.dir, &source, &options.targets)?);
    }

    for locale in &options.translate {
        match translate_locale(
            &options.dir,
            locale,
            translator,
            &options.retry,
            options.delay,
        ) {
            Ok(outcome) => summary.outcomes.push(outcome),
            Err(e) => summary
                .warnings
                .push(format!("skipping locale '{locale}': {e}")),
        }
    }

    Ok(summary)
}
