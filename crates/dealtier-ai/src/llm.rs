//! LLM-backed category classifier.
//!
//! Sends one chat-completion request per batch to an OpenAI-compatible
//! endpoint and expects a JSON array of `{tier, description}` objects back,
//! one per company, in order. Anything the model gets wrong — fenced output,
//! broken JSON, missing or out-of-range tiers, a short or long array — is
//! degraded item-wise to the unscored verdict; only transport and HTTP-level
//! failures surface as errors, and the pipeline degrades those too.

use async_trait::async_trait;
use dealtier_core::{CategoryVerdict, Tier};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{CategoryClassifier, CategoryRequest, ClassifierError};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.2;

/// Category classifier backed by an OpenAI-compatible chat endpoint.
pub struct LlmClassifier {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClassifier {
    /// `base_url` is the API root, e.g. `https://api.openai.com` (no trailing
    /// slash).
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── Wire format ──

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// One entry of the model's JSON array answer.
#[derive(Deserialize)]
struct RawVerdict {
    #[serde(default)]
    tier: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl CategoryClassifier for LlmClassifier {
    async fn classify(
        &self,
        batch: &[CategoryRequest],
    ) -> Result<Vec<CategoryVerdict>, ClassifierError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(batch),
            }],
            temperature: TEMPERATURE,
        };

        debug!(url = %url, batch = batch.len(), model = %self.model, "classifying batch");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ClassifierError::EmptyResponse)?;

        Ok(parse_verdicts(&content, batch.len()))
    }
}

/// Build the batch prompt: the sourcing rubric plus the companies as JSON.
fn build_prompt(batch: &[CategoryRequest]) -> String {
    let companies = serde_json::to_string_pretty(batch).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an analyst evaluating companies from their business descriptions and websites.\n\
         \n\
         For each company:\n\
         - Use the description and website to determine the business model.\n\
         - Return a tier (1-4) by the rules below.\n\
         - Generate a short, lowercase 2-3 word description of the business.\n\
         \n\
         Tiering rules:\n\
         - Tier 1: vertical/industrial B2B software, or B2B software plus hardware/services.\n\
         - Tier 2: horizontal B2B software.\n\
         - Tier 4: custom dev shop, system integrator, B2C, non-tech services.\n\
         - Tier 3: only if ambiguous between tier 2 and tier 4.\n\
         \n\
         Output format: a JSON array, one object per company, in input order:\n\
         [{{\"tier\": 1, \"description\": \"health data analytics\"}}, ...]\n\
         Return only the JSON array.\n\
         \n\
         Companies:\n{companies}\n"
    )
}

/// Parse the model's answer into exactly `expected` verdicts.
///
/// Degrades rather than fails: unparseable content yields all-unscored, a
/// short array is padded with unscored verdicts, a long one is truncated.
fn parse_verdicts(content: &str, expected: usize) -> Vec<CategoryVerdict> {
    let stripped = strip_code_fence(content.trim());

    let raw: Vec<RawVerdict> = match serde_json::from_str(stripped) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(%err, "classifier answer was not a JSON array; degrading batch to unscored");
            return vec![CategoryVerdict::unscored(); expected];
        }
    };

    if raw.len() != expected {
        warn!(
            got = raw.len(),
            expected, "classifier answer length mismatch; padding with unscored"
        );
    }

    let mut verdicts: Vec<CategoryVerdict> = raw
        .into_iter()
        .take(expected)
        .map(|item| CategoryVerdict {
            tier: item
                .tier
                .and_then(|t| u8::try_from(t).ok())
                .and_then(|t| Tier::new(t).ok()),
            label: item.description.unwrap_or_default(),
        })
        .collect();
    verdicts.resize(expected, CategoryVerdict::unscored());
    verdicts
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_answer_parses() {
        let content = r#"[
            {"tier": 1, "description": "dental practice saas"},
            {"tier": 4, "description": "it consulting"}
        ]"#;
        let verdicts = parse_verdicts(content, 2);
        assert_eq!(verdicts[0].tier, Some(Tier::T1));
        assert_eq!(verdicts[0].label, "dental practice saas");
        assert_eq!(verdicts[1].tier, Some(Tier::T4));
    }

    #[test]
    fn fenced_answer_parses() {
        let content = "```json\n[{\"tier\": 2, \"description\": \"hr software\"}]\n```";
        let verdicts = parse_verdicts(content, 1);
        assert_eq!(verdicts[0].tier, Some(Tier::T2));
    }

    #[test]
    fn garbage_degrades_to_unscored() {
        let verdicts = parse_verdicts("I could not classify these companies.", 3);
        assert_eq!(verdicts.len(), 3);
        assert!(verdicts.iter().all(|v| v.tier.is_none()));
    }

    #[test]
    fn null_and_out_of_range_tiers_unscored() {
        let content = r#"[
            {"tier": null, "description": "unclear"},
            {"tier": 7, "description": "out of range"},
            {"tier": 3, "description": "maybe saas"}
        ]"#;
        let verdicts = parse_verdicts(content, 3);
        assert_eq!(verdicts[0].tier, None);
        assert_eq!(verdicts[1].tier, None);
        assert_eq!(verdicts[2].tier, Some(Tier::T3));
        // Labels survive even when the tier does not.
        assert_eq!(verdicts[1].label, "out of range");
    }

    #[test]
    fn short_answer_padded_long_answer_truncated() {
        let short = parse_verdicts(r#"[{"tier": 1, "description": "a"}]"#, 3);
        assert_eq!(short.len(), 3);
        assert_eq!(short[0].tier, Some(Tier::T1));
        assert!(short[1].tier.is_none() && short[2].tier.is_none());

        let long = parse_verdicts(
            r#"[{"tier": 1, "description": "a"}, {"tier": 2, "description": "b"}]"#,
            1,
        );
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].tier, Some(Tier::T1));
    }

    #[test]
    fn missing_description_becomes_empty_label() {
        let verdicts = parse_verdicts(r#"[{"tier": 2}]"#, 1);
        assert_eq!(verdicts[0].tier, Some(Tier::T2));
        assert_eq!(verdicts[0].label, "");
    }

    #[test]
    fn prompt_carries_rubric_and_companies() {
        let batch = vec![CategoryRequest {
            description: "workflow software for dental clinics".into(),
            website: "https://example.com".into(),
        }];
        let prompt = build_prompt(&batch);
        assert!(prompt.contains("Tier 1: vertical/industrial B2B software"));
        assert!(prompt.contains("workflow software for dental clinics"));
        assert!(prompt.contains("https://example.com"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let classifier = LlmClassifier::new("https://api.openai.com/".into(), "sk-test".into());
        assert_eq!(classifier.base_url, "https://api.openai.com");
    }
}
