//! Calculated-measure translation seam
//!
//! Prepares translation requests for the external language-model translator and
//! records its responses. The response text is kept opaque: no attempt is made to
//! split an explanation from the formula.

use super::LineageError;
use crate::models::CalculatedMeasure;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// System prompt sent with every measure translation
pub const TRANSLATION_SYSTEM_PROMPT: &str =
    "You are an assistant that converts DAX expressions to Tableau calculated fields.";

/// Number of measures translated per batch when not configured otherwise
pub const DEFAULT_MAX_TRANSLATIONS: usize = 5;

/// One prepared translation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Measure name
    pub measure: String,
    /// Expression as it will be sent (newlines stripped if configured)
    pub expression: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Outcome of one translation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRecord {
    pub measure: String,
    pub source_expression: String,
    /// Opaque translator response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    /// Error reported by the translator, when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// External expression translator (typically an LLM client)
///
/// Implementations own any timeout or retry policy; failures are reported as
/// [`LineageError::UpstreamUnavailable`].
pub trait MeasureTranslator {
    fn translate(&self, request: &TranslationRequest) -> Result<String, LineageError>;
}

/// Options for preparing translation requests
#[derive(Debug, Clone, Copy)]
pub struct TranslationOptions {
    /// Maximum number of measures to prepare, in input order
    pub max_translations: usize,
    /// Remove line breaks from expressions before sending; both `\n` and `\r` are
    /// dropped, so CRLF expressions come out on one line too
    pub strip_newlines: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_translations: DEFAULT_MAX_TRANSLATIONS,
            strip_newlines: true,
        }
    }
}

/// Build translation requests for the first `max_translations` measures
///
/// # Example
///
/// ```rust
/// use bi_migration_sdk::convert::measures::{prepare_translations, TranslationOptions};
/// use bi_migration_sdk::models::CalculatedMeasure;
///
/// let measures = vec![CalculatedMeasure {
///     table_name: None,
///     name: "Total".to_string(),
///     display_folder: None,
///     expression: "SUM(\nSales[Amount])".to_string(),
///     description: None,
/// }];
/// let requests = prepare_translations(&measures, TranslationOptions::default());
/// assert_eq!(requests[0].expression, "SUM(Sales[Amount])");
/// ```
pub fn prepare_translations(
    measures: &[CalculatedMeasure],
    options: TranslationOptions,
) -> Vec<TranslationRequest> {
    measures
        .iter()
        .take(options.max_translations)
        .map(|m| {
            let expression = if options.strip_newlines {
                m.expression.replace(['\r', '\n'], "")
            } else {
                m.expression.clone()
            };
            TranslationRequest {
                measure: m.name.clone(),
                user_prompt: format!(
                    "Convert this DAX expression to Tableau calculated field: {}",
                    expression
                ),
                system_prompt: TRANSLATION_SYSTEM_PROMPT.to_string(),
                expression,
            }
        })
        .collect()
}

/// Send every request to the translator, recording failures instead of aborting
pub fn translate_measures(
    requests: &[TranslationRequest],
    translator: &dyn MeasureTranslator,
) -> Vec<TranslationRecord> {
    let mut failed = 0usize;
    let records: Vec<TranslationRecord> = requests
        .iter()
        .map(|request| match translator.translate(request) {
            Ok(text) => TranslationRecord {
                measure: request.measure.clone(),
                source_expression: request.expression.clone(),
                translated: Some(text.trim().to_string()),
                error: None,
            },
            Err(e) => {
                failed += 1;
                warn!("Translation of measure '{}' failed: {}", request.measure, e);
                TranslationRecord {
                    measure: request.measure.clone(),
                    source_expression: request.expression.clone(),
                    translated: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    info!(
        "Translated {} of {} measures",
        records.len() - failed,
        records.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl MeasureTranslator for Echo {
        fn translate(&self, request: &TranslationRequest) -> Result<String, LineageError> {
            if request.measure == "broken" {
                Err(LineageError::UpstreamUnavailable("timeout".to_string()))
            } else {
                Ok(format!("  Explanation\n{}  ", request.expression))
            }
        }
    }

    fn measure(name: &str, expression: &str) -> CalculatedMeasure {
        CalculatedMeasure {
            table_name: Some("Sales".to_string()),
            name: name.to_string(),
            display_folder: None,
            expression: expression.to_string(),
            description: None,
        }
    }

    #[test]
    fn limits_and_strips() {
        let measures: Vec<_> = (0..8).map(|i| measure(&format!("m{i}"), "A\r\nB")).collect();
        let requests = prepare_translations(&measures, TranslationOptions::default());
        assert_eq!(requests.len(), DEFAULT_MAX_TRANSLATIONS);
        assert_eq!(requests[0].expression, "AB");
        assert!(requests[0].user_prompt.ends_with(": AB"));

        let kept = prepare_translations(
            &measures,
            TranslationOptions {
                max_translations: 1,
                strip_newlines: false,
            },
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].expression, "A\r\nB");
    }

    #[test]
    fn carriage_returns_are_stripped_with_newlines() {
        let requests = prepare_translations(
            &[measure("cr", "SUM(\rSales[Amount])\n")],
            TranslationOptions::default(),
        );
        assert_eq!(requests[0].expression, "SUM(Sales[Amount])");
    }

    #[test]
    fn failures_are_recorded_and_batch_continues() {
        let requests = prepare_translations(
            &[measure("broken", "X"), measure("ok", "SUM(Y)")],
            TranslationOptions::default(),
        );
        let records = translate_measures(&requests, &Echo);
        assert_eq!(records.len(), 2);
        assert!(records[0].translated.is_none());
        assert!(records[0].error.as_deref().unwrap().contains("timeout"));
        assert_eq!(records[1].translated.as_deref(), Some("Explanation\nSUM(Y)"));
    }
}
