//! Reasoning enrichment — asks the LLM to relate each missing skill to the
//! candidate's known skills and suggest starter courses.
//!
//! This is optional decoration on an already-computed evaluation: any
//! failure (call error, timeout, schema mismatch) degrades to an empty map
//! and never touches the score. Model output is parsed as data only.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{strip_json_fences, LlmClient};
use crate::matching::vocabulary::SkillSet;

/// Upper bound on one enrichment call, independent of evaluation timeouts.
const REASONING_TIMEOUT: Duration = Duration::from_secs(45);

const REASONING_SYSTEM: &str =
    "You are an HR analyst. You respond with strict JSON only: no prose, no markdown.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSuggestion {
    pub title: String,
    pub provider: String,
}

/// Explanation of one missing skill relative to the candidate's known skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillExplanation {
    pub related_to: String,
    pub explanation: String,
    #[serde(default)]
    pub courses: Vec<CourseSuggestion>,
}

/// Missing-skill label -> explanation. BTreeMap keeps report output stable.
pub type ReasoningMap = BTreeMap<String, SkillExplanation>;

pub fn build_reasoning_prompt(matched: &SkillSet, missing: &SkillSet) -> String {
    let known: Vec<&str> = matched.iter().map(|l| l.as_str()).collect();
    let gaps: Vec<&str> = missing.iter().map(|l| l.as_str()).collect();

    format!(
        r#"Given the candidate's known skills and the job's missing skills:

KNOWN SKILLS: {known:?}
MISSING SKILLS: {gaps:?}

For EACH missing skill, state whether it is a subskill, specialization, tool,
or concept related to any known skill, explain how, and suggest two
beginner-friendly online courses (name and provider only).

Return STRICT JSON in exactly this shape, keyed by missing skill:
{{
  "skill_name": {{
    "related_to": "a known skill or 'not related'",
    "explanation": "why it is missing and how it relates",
    "courses": [
      {{"title": "string", "provider": "string"}},
      {{"title": "string", "provider": "string"}}
    ]
  }}
}}

Return JSON only. No extra words, no markdown."#
    )
}

/// Parses model output into the expected map shape.
///
/// First attempt: strict deserialization of the (fence-stripped) text.
/// Salvage attempt: the first top-level JSON object found by regex, for
/// models that pad the JSON with prose. Anything else is a mismatch.
pub fn parse_reasoning(text: &str) -> Option<ReasoningMap> {
    let stripped = strip_json_fences(text);
    if let Ok(map) = serde_json::from_str::<ReasoningMap>(stripped) {
        return Some(map);
    }

    static OBJECT_RE: OnceLock<Regex> = OnceLock::new();
    let re = OBJECT_RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));
    let candidate = re.find(stripped)?.as_str();
    serde_json::from_str::<ReasoningMap>(candidate).ok()
}

/// Produces the explanation map for a gap partition. Never fails: on any
/// error or timeout the result is an empty map and a warning.
pub async fn explain_gaps(llm: &LlmClient, matched: &SkillSet, missing: &SkillSet) -> ReasoningMap {
    if missing.is_empty() {
        return ReasoningMap::new();
    }

    let prompt = build_reasoning_prompt(matched, missing);
    let call = llm.call(&prompt, REASONING_SYSTEM);

    let text = match tokio::time::timeout(REASONING_TIMEOUT, call).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("skill reasoning call failed, continuing without enrichment: {e}");
            return ReasoningMap::new();
        }
        Err(_) => {
            warn!(
                "skill reasoning timed out after {}s, continuing without enrichment",
                REASONING_TIMEOUT.as_secs()
            );
            return ReasoningMap::new();
        }
    };

    match parse_reasoning(&text) {
        Some(map) => map,
        None => {
            warn!("skill reasoning returned unparseable output, dropping it");
            ReasoningMap::new()
        }
    }
}
