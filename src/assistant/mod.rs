//! Natural-language filter extraction.
//!
//! A free-text query ("centros a 50 km") is wrapped in a fixed instruction
//! prompt and sent to a text-completion service. The reply is expected to be
//! a JSON object `{"valor": <int>, "unidad": "km" | "minutos"}`. A reply
//! that names some other unit is reported separately so the chat can ask for
//! km or minutes; anything else, including transport failures, means "no
//! filter recognized".

pub mod gemini;
pub mod prompt;

use serde::Deserialize;
use thiserror::Error;

use crate::data::filter::ActiveFilter;

// ---------------------------------------------------------------------------
// Filter spec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Unit {
    #[serde(rename = "km")]
    Km,
    #[serde(rename = "minutos")]
    Minutes,
}

/// Structured filter recovered from a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FilterSpec {
    #[serde(rename = "valor")]
    pub value: i64,
    #[serde(rename = "unidad")]
    pub unit: Unit,
}

impl FilterSpec {
    /// The filter this spec stands for. Kilometres bound distance, minutes
    /// bound travel time; the other bound is cleared.
    pub fn to_filter(self) -> ActiveFilter {
        match self.unit {
            Unit::Km => ActiveFilter::distance(self.value as f64),
            Unit::Minutes => ActiveFilter::time(self.value as f64),
        }
    }

    /// Human-readable confirmation shown in the chat.
    pub fn describe(&self) -> String {
        let unit = match self.unit {
            Unit::Km => "km",
            Unit::Minutes => "minutos",
        };
        format!(
            "**Aplicando filtro:** Mostrando centros a un máximo de **{} {unit}** de Santiago.",
            self.value
        )
    }
}

// ---------------------------------------------------------------------------
// Extractor seam
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("language model is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service returned no text")]
    EmptyReply,

    #[error("failed to render prompt: {0}")]
    Template(#[from] minijinja::Error),
}

/// A text-completion backend. Given a full prompt, return the raw reply text.
pub trait FilterExtractor {
    fn complete(&self, prompt: &str) -> Result<String, ExtractError>;
}

/// Stand-in used when no API key is configured.
pub struct Unconfigured;

impl FilterExtractor for Unconfigured {
    fn complete(&self, _prompt: &str) -> Result<String, ExtractError> {
        Err(ExtractError::NotConfigured)
    }
}

/// Outcome of reading a model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Filter(FilterSpec),
    /// Both `valor` and `unidad` were given, but the unit is neither `km`
    /// nor `minutos`.
    UnknownUnit,
    Nothing,
}

impl Extraction {
    pub fn filter(self) -> Option<FilterSpec> {
        match self {
            Extraction::Filter(spec) => Some(spec),
            Extraction::UnknownUnit | Extraction::Nothing => None,
        }
    }
}

/// Run a query through the extractor. Transport and template failures
/// collapse to [`Extraction::Nothing`].
pub fn extract_filter(extractor: &dyn FilterExtractor, query: &str) -> Extraction {
    let reply = prompt::render_filter_prompt(query)
        .map_err(ExtractError::from)
        .and_then(|prompt| extractor.complete(&prompt));

    match reply {
        Ok(text) => {
            log::debug!("Model reply: {text}");
            parse_filter_response(&text)
        }
        Err(e) => {
            log::warn!("Filter extraction failed: {e}");
            Extraction::Nothing
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Both keys of a reply, whatever their types.
#[derive(Debug, Deserialize)]
struct RawReply {
    valor: Option<serde_json::Value>,
    unidad: Option<serde_json::Value>,
}

/// Parse the model's reply.
///
/// Accepts a bare object or one wrapped in a markdown code fence. An empty
/// object, a missing key or a non-integer value yield
/// [`Extraction::Nothing`].
pub fn parse_filter_response(text: &str) -> Extraction {
    let Some(json) = extract_json_object(text) else {
        return Extraction::Nothing;
    };
    match serde_json::from_str::<FilterSpec>(json) {
        Ok(spec) => Extraction::Filter(spec),
        Err(e) => {
            log::debug!("Reply is not a filter spec: {e}");
            match serde_json::from_str::<RawReply>(json) {
                Ok(RawReply {
                    valor: Some(_),
                    unidad: Some(unit),
                }) if unit != "km" && unit != "minutos" => Extraction::UnknownUnit,
                _ => Extraction::Nothing,
            }
        }
    }
}

/// Pull the JSON object out of a reply that may be wrapped in ```json fences.
fn extract_json_object(text: &str) -> Option<&str> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Skip an optional language tag on the opening fence line.
        let after_tag = rest.find('\n').map_or(rest, |i| &rest[i + 1..]);
        body = after_tag.rsplit_once("```").map_or(after_tag, |(inner, _)| inner);
        body = body.trim();
    }
    body.starts_with('{').then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        reply: Result<String, ()>,
        seen: RefCell<Option<String>>,
    }

    impl FilterExtractor for Canned {
        fn complete(&self, prompt: &str) -> Result<String, ExtractError> {
            *self.seen.borrow_mut() = Some(prompt.to_string());
            self.reply.clone().map_err(|_| ExtractError::EmptyReply)
        }
    }

    fn canned(reply: &str) -> Canned {
        Canned {
            reply: Ok(reply.to_string()),
            seen: RefCell::new(None),
        }
    }

    #[test]
    fn km_reply_becomes_distance_filter() {
        let spec = parse_filter_response(r#"{"valor": 50, "unidad": "km"}"#)
            .filter()
            .unwrap();
        assert_eq!(
            spec,
            FilterSpec {
                value: 50,
                unit: Unit::Km
            }
        );
        assert_eq!(spec.to_filter(), ActiveFilter::distance(50.0));
    }

    #[test]
    fn minutes_reply_becomes_time_filter() {
        let spec = parse_filter_response(r#"{"valor": 45, "unidad": "minutos"}"#)
            .filter()
            .unwrap();
        assert_eq!(spec.to_filter(), ActiveFilter::time(45.0));
    }

    #[test]
    fn empty_object_means_no_filter() {
        assert_eq!(parse_filter_response("{}"), Extraction::Nothing);
    }

    #[test]
    fn malformed_replies_mean_no_filter() {
        for reply in [
            "No entiendo la pregunta.",
            r#"{"valor": 50}"#,
            r#"{"unidad": "km"}"#,
            r#"{"unidad": "horas"}"#,
            r#"{"valor": 12.5, "unidad": "km"}"#,
            r#"{"valor": 50, "unidad": "km""#,
            "",
        ] {
            assert_eq!(parse_filter_response(reply), Extraction::Nothing, "{reply:?}");
        }
    }

    #[test]
    fn other_units_are_reported_separately() {
        assert_eq!(
            parse_filter_response(r#"{"valor": 2, "unidad": "horas"}"#),
            Extraction::UnknownUnit
        );
        assert_eq!(
            parse_filter_response(r#"{"valor": 2.5, "unidad": "millas"}"#),
            Extraction::UnknownUnit
        );
        assert_eq!(
            parse_filter_response(r#"{"valor": 50, "unidad": "KM"}"#),
            Extraction::UnknownUnit
        );
    }

    #[test]
    fn fenced_reply_is_unwrapped() {
        let reply = "```json\n{\"valor\": 20, \"unidad\": \"minutos\"}\n```\n";
        assert_eq!(
            parse_filter_response(reply),
            Extraction::Filter(FilterSpec {
                value: 20,
                unit: Unit::Minutes
            })
        );
        assert!(
            parse_filter_response("```\n{\"valor\": 3, \"unidad\": \"km\"}\n```")
                .filter()
                .is_some()
        );
    }

    #[test]
    fn value_is_trusted_as_is() {
        let spec = parse_filter_response(r#"{"valor": -5, "unidad": "km"}"#)
            .filter()
            .unwrap();
        assert_eq!(spec.value, -5);
    }

    #[test]
    fn extract_filter_sends_rendered_prompt() {
        let backend = canned(r#"{"valor": 50, "unidad": "km"}"#);
        let spec = extract_filter(&backend, "Quiero ver los centros a 50 km de Santiago.").filter();

        assert_eq!(spec.map(|s| s.unit), Some(Unit::Km));
        let prompt = backend.seen.borrow().clone().unwrap();
        assert!(prompt.contains("Consulta: \"Quiero ver los centros a 50 km de Santiago.\""));
    }

    #[test]
    fn extract_filter_without_distance_yields_nothing() {
        let backend = canned("{}");
        assert_eq!(
            extract_filter(&backend, "Simplemente quiero ver los centros."),
            Extraction::Nothing
        );
    }

    #[test]
    fn backend_failure_yields_nothing() {
        let backend = Canned {
            reply: Err(()),
            seen: RefCell::new(None),
        };
        assert_eq!(extract_filter(&backend, "centros a 10 km"), Extraction::Nothing);
        assert_eq!(extract_filter(&Unconfigured, "centros a 10 km"), Extraction::Nothing);
    }

    #[test]
    fn describe_mentions_value_and_unit() {
        let spec = FilterSpec {
            value: 40,
            unit: Unit::Minutes,
        };
        assert!(spec.describe().contains("**40 minutos**"));
    }
}
