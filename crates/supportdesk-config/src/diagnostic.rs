// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment failures into miette reports for `supportdesk.toml`.
//!
//! Unknown keys get a "did you mean" hint scored with Jaro-Winkler, and both
//! unknown keys and mistyped values are underlined in the file they came from.
//! Key lookup is table-aware: a key is only matched between its own `[table]`
//! header and the next header.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Everything that can go wrong between reading `supportdesk.toml` and
/// handing a validated [`crate::DeskConfig`] to the binary.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(supportdesk::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest accepted key, when one is similar enough.
        suggestion: Option<String>,
        /// Keys the enclosing table accepts, comma separated.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(supportdesk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `server.port`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(supportdesk::config::missing_key),
        help("add `{key} = <value>` to supportdesk.toml")
    )]
    MissingKey { key: String },

    /// Parsed fine but out of range or inconsistent.
    #[error("validation error: {message}")]
    #[diagnostic(code(supportdesk::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(supportdesk::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    let Some(suggestion) = suggestion else {
        return format!("valid keys: {valid_keys}");
    };
    format!("did you mean `{suggestion}`? Valid keys: {valid_keys}")
}

/// Converts every error figment collected into a [`ConfigError`].
///
/// `toml_sources` pairs each config file path with its content; an error
/// that originated in one of them gets a span into that file.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();
    for error in err {
        let path: Vec<String> = error.path.iter().map(ToString::to_string).collect();
        let source = originating_source(&error, toml_sources);

        let converted = match &error.kind {
            Kind::UnknownField(field, accepted) => {
                let (span, src) = underline(source, &path, field);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, accepted),
                    valid_keys: accepted.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted(&path, Some(&**field)),
            },
            Kind::InvalidType(found, expected) => {
                let (span, src) = match path.split_last() {
                    Some((field, table)) => underline(source, table, field),
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key: dotted(&path, None),
                    detail: format!("found {found}, expected {expected}"),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        };
        errors.push(converted);
    }
    errors
}

fn dotted(table: &[String], field: Option<&str>) -> String {
    let mut parts: Vec<&str> = table.iter().map(String::as_str).collect();
    parts.extend(field);
    parts.join(".")
}

/// The `(path, content)` pair of the file figment attributes the error to.
fn originating_source<'a>(
    error: &figment::error::Error,
    toml_sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str)> {
    let Some(figment::Source::File(file)) = error.metadata.as_ref()?.source.as_ref() else {
        return None;
    };
    let file = file.display().to_string();
    toml_sources
        .iter()
        .find(|(path, _)| *path == file)
        .map(|(path, content)| (path.as_str(), content.as_str()))
}

fn underline(
    source: Option<(&str, &str)>,
    table: &[String],
    field: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((path, content)) = source else {
        return (None, None);
    };
    match locate_key(content, table, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` as a bare key inside `table` (empty = document root).
///
/// Only the lines between the table's header and the next header are
/// searched, so `[gemini.models]` never matches a lookup in `[gemini]`.
pub fn locate_key(content: &str, table: &[String], field: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let body = line.trim_start();
        let indent = line.len() - body.len();
        if let Some(header) = table_header(body) {
            current = header;
            continue;
        }
        if current != wanted {
            continue;
        }
        if let Some(rest) = body.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(start + indent);
        }
    }
    None
}

/// The dotted name of a `[table]` header line, whitespace normalized.
fn table_header(line: &str) -> Option<String> {
    let inner = line.trim_end().strip_prefix('[')?;
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let end = inner.find(']')?;
    let name: Vec<&str> = inner[..end].split('.').map(str::trim).collect();
    Some(name.join("."))
}

/// Best accepted key for a misspelled one, if any clears the threshold.
///
/// Dashes count as underscores and case is ignored, so `Drain-Timeout-Secs`
/// still lands on `drain_timeout_secs`. Ties keep the earlier key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let normalized = unknown.to_ascii_lowercase().replace('-', "_");

    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(&normalized, key)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .fold(None, |best: Option<(&str, f64)>, candidate| match best {
            Some(kept) if kept.1 >= candidate.1 => Some(kept),
            _ => Some(candidate),
        })
        .map(|(key, _)| key.to_string())
}

/// Renders one error the way `supportdesk` prints it at startup.
pub fn render_report(error: &ConfigError) -> String {
    let mut out = String::new();
    let diagnostic: &dyn Diagnostic = error;
    match GraphicalReportHandler::new().render_report(&mut out, diagnostic) {
        Ok(()) => out,
        Err(_) => format!("Error: {error}\n"),
    }
}

/// Writes every error to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprint!("{}", render_report(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[server]
port = 8080

[gemini]
timeout_secs = 30

[gemini.models]
timeout_secs = 5

[triage]
enabeld = true
";

    fn table(name: &str) -> Vec<String> {
        name.split('.').map(str::to_string).collect()
    }

    #[test]
    fn suggests_threshold_for_misspelled_triage_key() {
        let accepted = &["enabled", "match_confidence_threshold", "drain_timeout_secs"];
        assert_eq!(
            suggest_key("match_confidence_treshold", accepted).as_deref(),
            Some("match_confidence_threshold")
        );
    }

    #[test]
    fn dashed_and_uppercase_keys_are_normalized() {
        let accepted = &["enabled", "match_confidence_threshold", "drain_timeout_secs"];
        assert_eq!(
            suggest_key("Drain-Timeout-Secs", accepted).as_deref(),
            Some("drain_timeout_secs")
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("zzzzzz", &["name", "log_level"]), None);
    }

    #[test]
    fn locates_key_in_its_own_table() {
        let offset = locate_key(SAMPLE, &table("triage"), "enabeld").unwrap();
        assert_eq!(&SAMPLE[offset..offset + 7], "enabeld");
    }

    #[test]
    fn nested_table_does_not_shadow_parent() {
        let parent = locate_key(SAMPLE, &table("gemini"), "timeout_secs").unwrap();
        let nested = locate_key(SAMPLE, &table("gemini.models"), "timeout_secs").unwrap();
        assert!(parent < nested);
        assert!(SAMPLE[..parent].ends_with("[gemini]\n"));
    }

    #[test]
    fn key_in_a_later_table_is_not_matched() {
        assert!(locate_key(SAMPLE, &table("server"), "enabeld").is_none());
        assert!(locate_key(SAMPLE, &[], "port").is_none());
    }

    #[test]
    fn missing_table_yields_no_offset() {
        assert!(locate_key(SAMPLE, &table("auth"), "admin_token").is_none());
    }

    #[test]
    fn report_carries_label_and_hint() {
        let offset = locate_key(SAMPLE, &table("triage"), "enabeld").unwrap();
        let error = ConfigError::UnknownKey {
            key: "enabeld".to_string(),
            suggestion: suggest_key("enabeld", &["enabled", "drain_timeout_secs"]),
            valid_keys: "enabled, drain_timeout_secs".to_string(),
            span: Some(SourceSpan::new(offset.into(), 7)),
            src: Some(NamedSource::new("supportdesk.toml", SAMPLE.to_string())),
        };

        let report = render_report(&error);
        assert!(report.contains("this key is not recognized"));
        assert!(report.contains("did you mean `enabled`"));
    }
}
