//! Generative-AI content-fill adapter.
//!
//! Speaks the Gemini `generateContent` REST surface with a constrained
//! JSON response schema. The call is opaque, retryable and fallible;
//! malformed or empty model output degrades to an empty fill which merges
//! as a no-op.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("ai transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ai service responded with status {0}")]
    Status(u16),
    #[error("ai service returned no content")]
    Empty,
}

/// Partial posting record produced by the model. Every field is optional;
/// the schema marks title/department/category/shortInfo required but the
/// parse never relies on that.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPostingFill {
    pub title: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub short_info: Option<String>,
    pub important_dates: Option<String>,
    pub fee: Option<String>,
    pub age_limit: Option<String>,
    pub total_posts: Option<String>,
    pub vacancy_details: Option<String>,
    pub eligibility: Option<String>,
    pub how_to_apply: Option<String>,
    pub selection_process: Option<String>,
    pub official_website: Option<String>,
}

impl AiPostingFill {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct GenAiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Draft a complete posting from a bare title.
    pub async fn generate_from_title(&self, title: &str) -> Result<AiPostingFill, AiError> {
        let prompt = format!(
            "Generate a professional government recruitment notification for: {title}. \
             MANDATORY: The \"shortInfo\" field must contain a very detailed description \
             between 150 and 200 words."
        );
        self.structured_call(&prompt).await
    }

    /// Extract a posting from an official notification URL.
    pub async fn sync_from_link(&self, url: &str) -> Result<AiPostingFill, AiError> {
        let prompt = format!(
            "Extract recruitment details from: {url}. MANDATORY: Create a new \
             \"shortInfo\" field which is a professional summary of 150-200 words \
             about this job."
        );
        self.structured_call(&prompt).await
    }

    /// Plain-text 200-word summary for the description field alone.
    pub async fn generate_description(
        &self,
        title: &str,
        department: &str,
    ) -> Result<String, AiError> {
        let prompt = format!(
            "Write a professional 200-word recruitment summary for the post \
             \"{title}\" in \"{department}\". Keep it formal and informative."
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let text = self.dispatch(&body).await?;
        Ok(text)
    }

    async fn structured_call(&self, prompt: &str) -> Result<AiPostingFill, AiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": posting_schema(),
            },
        });
        let text = self.dispatch(&body).await?;
        // Malformed model output degrades to an empty fill.
        let fill = serde_json::from_str(&text).unwrap_or_default();
        debug!(target = "rozgar::ai", response_bytes = text.len(), "structured fill parsed");
        Ok(fill)
    }

    async fn dispatch(&self, body: &serde_json::Value) -> Result<String, AiError> {
        metrics::counter!("rozgar_ai_requests_total").increment(1);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            metrics::counter!("rozgar_ai_failures_total").increment(1);
            return Err(AiError::Status(status.as_u16()));
        }
        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(AiError::Empty)
    }
}

fn posting_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Post title e.g., UPSSSC Lekhpal 2025" },
            "department": { "type": "STRING", "description": "Full organization name" },
            "shortInfo": { "type": "STRING", "description": "A highly detailed professional description of the recruitment, exactly 150 to 200 words long." },
            "importantDates": { "type": "STRING", "description": "Detailed dates list" },
            "fee": { "type": "STRING", "description": "Detailed fee structure" },
            "ageLimit": { "type": "STRING", "description": "Age limit requirements" },
            "totalPosts": { "type": "STRING", "description": "Number of vacancies" },
            "vacancyDetails": { "type": "STRING", "description": "Post-wise vacancy count" },
            "eligibility": { "type": "STRING", "description": "Qualification details" },
            "howToApply": { "type": "STRING", "description": "Step by step instructions" },
            "selectionProcess": { "type": "STRING", "description": "Exam/Interview details" },
            "category": { "type": "STRING", "description": "Category e.g. Latest Jobs" },
            "officialWebsite": { "type": "STRING", "description": "Official URL" }
        },
        "required": ["title", "department", "category", "shortInfo"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
