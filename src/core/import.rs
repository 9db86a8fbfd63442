//! core::import
//!
//! Bulk import of merchants from CSV or JSON files.
//!
//! # Design
//!
//! Import runs in two phases:
//!
//! 1. **Parse**: the whole file is turned into [`ImportRow`]s. Any shape
//!    problem (not an array, a missing field, a short CSV row) rejects the
//!    file before a single row is looked at.
//! 2. **Process**: each row is checked on its own. Bad input or a store
//!    that fails validation is recorded as a [`RowFailure`] and processing
//!    moves on. Duplicate handles, against existing records or rows
//!    accepted earlier in the same batch, are skipped rather than failed.
//!
//! The caller writes the store once, and only if something was added.
//!
//! # File formats
//!
//! JSON is an array of objects with string `name` and `handle` fields:
//!
//! ```json
//! [{ "name": "Acme Co", "handle": "acme" }]
//! ```
//!
//! CSV is one `name,handle` pair per line. Blank lines and lines starting
//! with `#` are ignored, and a first line mentioning both "name" and
//! "handle" is treated as a header. Extra columns are ignored.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use super::merchant::Merchant;
use super::types::{Handle, HandleError};
use crate::validator::{ProbeError, StoreValidator};

/// Errors that reject a whole import file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid JSON format: JSON file must contain an array of objects")]
    NotArray,

    #[error("Invalid JSON format: each JSON object must have \"name\" and \"handle\" fields (item {index} has no string \"{field}\")")]
    MissingField { index: usize, field: &'static str },

    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("Line {line}: CSV must have at least 2 columns (name, handle)")]
    TooFewColumns { line: usize },
}

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Use `explicit` when given, otherwise `.json` files are JSON and
    /// everything else is CSV.
    pub fn detect(path: &Path, explicit: Option<ImportFormat>) -> Self {
        if let Some(format) = explicit {
            return format;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }

    /// Upper-case name for messages.
    pub fn label(self) -> &'static str {
        match self {
            ImportFormat::Csv => "CSV",
            ImportFormat::Json => "JSON",
        }
    }
}

/// One unvalidated row from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub name: String,
    pub handle: String,
}

impl ImportRow {
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
        }
    }
}

/// Parse file content into rows.
pub fn parse(content: &str, format: ImportFormat) -> Result<Vec<ImportRow>, ImportError> {
    match format {
        ImportFormat::Json => parse_json(content),
        ImportFormat::Csv => parse_csv(content),
    }
}

fn parse_json(content: &str) -> Result<Vec<ImportRow>, ImportError> {
    let data: Value =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let items = data.as_array().ok_or(ImportError::NotArray)?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let field = |field: &'static str| {
                item.get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or(ImportError::MissingField {
                        index: i + 1,
                        field,
                    })
            };
            Ok(ImportRow {
                name: field("name")?,
                handle: field("handle")?,
            })
        })
        .collect()
}

fn parse_csv(content: &str) -> Result<Vec<ImportRow>, ImportError> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let Some(first) = lines.first() else {
        return Ok(Vec::new());
    };

    let first = first.to_lowercase();
    let start = usize::from(first.contains("name") && first.contains("handle"));

    lines[start..]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut parts = line.split(',').map(str::trim);
            match (parts.next(), parts.next()) {
                (Some(name), Some(handle)) => Ok(ImportRow::new(name, handle)),
                _ => Err(ImportError::TooFewColumns {
                    line: start + i + 1,
                }),
            }
        })
        .collect()
}

/// Why a row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyName,
    EmptyHandle,
    InvalidHandle,
    StoreNotFound,
}

/// A row that failed, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based row number among parsed rows.
    pub row: usize,
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for RowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// Outcome of processing a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl ImportSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether any row failed. Skipped duplicates do not count.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Progress notifications emitted while processing.
#[derive(Debug)]
pub enum ImportEvent<'a> {
    /// The handle is already registered.
    Skipped {
        row: usize,
        total: usize,
        name: &'a str,
        handle: &'a Handle,
    },
    /// About to probe the store.
    Checking {
        row: usize,
        total: usize,
        name: &'a str,
        handle: &'a Handle,
    },
    /// The probe failed.
    ProbeFailed {
        row: usize,
        handle: &'a Handle,
        error: &'a ProbeError,
    },
    /// The merchant was accepted.
    Added {
        row: usize,
        total: usize,
        merchant: &'a Merchant,
    },
}

/// Processes parsed rows against the existing registry.
pub struct Importer<'v> {
    validator: Option<&'v dyn StoreValidator>,
}

impl<'v> Importer<'v> {
    /// `None` skips store validation and records the myshopify URL.
    pub fn new(validator: Option<&'v dyn StoreValidator>) -> Self {
        Self { validator }
    }

    /// Process `rows` in order, appending accepted merchants to `merchants`.
    pub async fn run<F>(
        &self,
        merchants: &mut Vec<Merchant>,
        rows: &[ImportRow],
        mut on_event: F,
    ) -> ImportSummary
    where
        F: FnMut(ImportEvent<'_>),
    {
        let total = rows.len();
        let mut summary = ImportSummary::default();

        for (i, input) in rows.iter().enumerate() {
            let row = i + 1;
            let mut fail = |kind, message: String| {
                summary.failures.push(RowFailure { row, kind, message });
            };

            let name = input.name.trim();
            if name.is_empty() {
                fail(FailureKind::EmptyName, "Merchant name cannot be empty".into());
                continue;
            }

            let handle = match Handle::normalize(&input.handle) {
                Ok(handle) => handle,
                Err(HandleError::Empty) => {
                    fail(FailureKind::EmptyHandle, "Handle cannot be empty".into());
                    continue;
                }
                Err(HandleError::InvalidFormat(raw)) => {
                    fail(
                        FailureKind::InvalidHandle,
                        format!(
                            "Invalid handle format \"{}\" (must be lowercase letters, numbers, and hyphens)",
                            raw
                        ),
                    );
                    continue;
                }
            };

            if merchants.iter().any(|m| m.handle == handle.as_str()) {
                on_event(ImportEvent::Skipped {
                    row,
                    total,
                    name,
                    handle: &handle,
                });
                summary.skipped += 1;
                continue;
            }

            let url = match self.validator {
                None => handle.myshopify_url(),
                Some(validator) => {
                    on_event(ImportEvent::Checking {
                        row,
                        total,
                        name,
                        handle: &handle,
                    });
                    match validator.probe(&handle).await {
                        Ok(info) => info.frontend_url,
                        Err(error) => {
                            on_event(ImportEvent::ProbeFailed {
                                row,
                                handle: &handle,
                                error: &error,
                            });
                            summary.failures.push(RowFailure {
                                row,
                                kind: FailureKind::StoreNotFound,
                                message: format!("Store \"{}.myshopify.com\" not found", handle),
                            });
                            continue;
                        }
                    }
                }
            };

            merchants.push(Merchant::new(name, &handle, url));
            if let Some(merchant) = merchants.last() {
                on_event(ImportEvent::Added {
                    row,
                    total,
                    merchant,
                });
            }
            summary.added += 1;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::mock::MockValidator;

    fn existing(name: &str, handle: &str) -> Merchant {
        let handle = Handle::normalize(handle).unwrap();
        let url = handle.myshopify_url();
        Merchant::new(name, &handle, url)
    }

    #[test]
    fn detect_by_extension_unless_overridden() {
        assert_eq!(
            ImportFormat::detect(Path::new("a.json"), None),
            ImportFormat::Json
        );
        assert_eq!(
            ImportFormat::detect(Path::new("a.csv"), None),
            ImportFormat::Csv
        );
        assert_eq!(
            ImportFormat::detect(Path::new("a.txt"), None),
            ImportFormat::Csv
        );
        assert_eq!(
            ImportFormat::detect(Path::new("a.json"), Some(ImportFormat::Csv)),
            ImportFormat::Csv
        );
    }

    #[test]
    fn csv_with_header_comments_and_blanks() {
        let content = "# exported\nname,handle\n\nAcme Co, acme\n  Beta Shop , beta,extra\n";
        let rows = parse(content, ImportFormat::Csv).unwrap();
        assert_eq!(
            rows,
            vec![
                ImportRow::new("Acme Co", "acme"),
                ImportRow::new("Beta Shop", "beta"),
            ]
        );
    }

    #[test]
    fn csv_without_header() {
        let rows = parse("Acme Co,acme", ImportFormat::Csv).unwrap();
        assert_eq!(rows, vec![ImportRow::new("Acme Co", "acme")]);
    }

    #[test]
    fn csv_short_row_rejects_file() {
        let err = parse("name,handle\nAcme Co,acme\nBroken", ImportFormat::Csv).unwrap_err();
        assert_eq!(err, ImportError::TooFewColumns { line: 3 });

        let err = parse("Broken", ImportFormat::Csv).unwrap_err();
        assert_eq!(err, ImportError::TooFewColumns { line: 1 });
    }

    #[test]
    fn csv_empty_file() {
        assert!(parse("\n# nothing\n", ImportFormat::Csv).unwrap().is_empty());
    }

    #[test]
    fn json_rows() {
        let content = r#"[{"name":"Acme Co","handle":"acme","note":"x"},{"name":"","handle":"beta"}]"#;
        let rows = parse(content, ImportFormat::Json).unwrap();
        assert_eq!(
            rows,
            vec![ImportRow::new("Acme Co", "acme"), ImportRow::new("", "beta")]
        );
    }

    #[test]
    fn json_not_array() {
        let err = parse(r#"{"name":"Acme","handle":"acme"}"#, ImportFormat::Json).unwrap_err();
        assert_eq!(err, ImportError::NotArray);
    }

    #[test]
    fn json_missing_field() {
        let err = parse(r#"[{"name":"Acme"}]"#, ImportFormat::Json).unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingField {
                index: 1,
                field: "handle"
            }
        );
    }

    #[test]
    fn json_syntax_error() {
        assert!(matches!(
            parse("[", ImportFormat::Json),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn accepts_rows_without_validation() {
        let mut merchants = Vec::new();
        let rows = vec![
            ImportRow::new("Acme Co", " ACME "),
            ImportRow::new(" Beta Shop ", "beta"),
        ];

        let summary = Importer::new(None).run(&mut merchants, &rows, |_| {}).await;

        assert_eq!(summary.added, 2);
        assert!(!summary.has_failures());
        assert_eq!(merchants[0].handle, "acme");
        assert_eq!(merchants[0].url, "https://acme.myshopify.com");
        assert_eq!(merchants[1].name, "Beta Shop");
    }

    #[tokio::test]
    async fn duplicates_are_skipped_not_failed() {
        let mut merchants = vec![existing("Old", "old")];
        let rows = vec![
            ImportRow::new("Old Again", "old"),
            ImportRow::new("Acme", "acme"),
            ImportRow::new("Acme Twin", "acme"),
        ];

        let mut skipped_rows = Vec::new();
        let summary = Importer::new(None)
            .run(&mut merchants, &rows, |event| {
                if let ImportEvent::Skipped { row, .. } = event {
                    skipped_rows.push(row);
                }
            })
            .await;

        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 2);
        assert!(!summary.has_failures());
        assert_eq!(skipped_rows, vec![1, 3]);
        assert_eq!(merchants.len(), 2);
    }

    #[tokio::test]
    async fn bad_rows_fail_independently() {
        let mut merchants = Vec::new();
        let rows = vec![
            ImportRow::new("", "acme"),
            ImportRow::new("Beta", "  "),
            ImportRow::new("Gamma", "gamma shop"),
            ImportRow::new("Delta", "delta"),
        ];

        let summary = Importer::new(None).run(&mut merchants, &rows, |_| {}).await;

        let kinds: Vec<_> = summary.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FailureKind::EmptyName,
                FailureKind::EmptyHandle,
                FailureKind::InvalidHandle
            ]
        );
        assert_eq!(summary.failures[0].to_string(), "Row 1: Merchant name cannot be empty");
        assert_eq!(summary.added, 1);
        assert_eq!(merchants[0].handle, "delta");
    }

    #[tokio::test]
    async fn validation_failure_and_custom_domain() {
        let validator = MockValidator::new()
            .with_live("acme")
            .with_custom_domain("acme", "https://acme.com");
        let mut merchants = Vec::new();
        let rows = vec![ImportRow::new("Acme", "acme"), ImportRow::new("Ghost", "ghost")];

        let summary = Importer::new(Some(&validator))
            .run(&mut merchants, &rows, |_| {})
            .await;

        assert_eq!(summary.added, 1);
        assert_eq!(merchants[0].url, "https://acme.com");
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].kind, FailureKind::StoreNotFound);
        assert_eq!(
            summary.failures[0].to_string(),
            "Row 2: Store \"ghost.myshopify.com\" not found"
        );
        assert_eq!(validator.probes(), vec!["acme", "ghost"]);
    }

    #[tokio::test]
    async fn duplicates_are_not_probed() {
        let validator = MockValidator::new().with_live("acme");
        let mut merchants = vec![existing("Acme", "acme")];
        let rows = vec![ImportRow::new("Acme", "acme")];

        let summary = Importer::new(Some(&validator))
            .run(&mut merchants, &rows, |_| {})
            .await;

        assert_eq!(summary.skipped, 1);
        assert!(validator.probes().is_empty());
    }
}
