use base64::Engine;

use crate::base;
use crate::base::extract::{ExtractedFields, ExtractionError, Image};

const PROMPT: &str = r#"Read the receipt in this image and extract its details.
Reply with a single JSON object and nothing else: no markdown, no code fences, no commentary.
Use exactly these keys:
{
  "vendor_name": "store or business name",
  "receipt_no": "receipt or invoice number",
  "receipt_time": "date and time in ISO 8601, e.g. 2026-02-15T14:30:00Z",
  "subtotal": 0.00,
  "gst_hst": 0.00,
  "pst_qst": 0.00,
  "tax": 0.00,
  "total": 0.00,
  "payment": "payment method such as Credit Card, Debit Card or Cash",
  "chart_of_acct": "expense category such as Office Supplies, Meals & Entertainment or Vehicle Expenses"
}
Amounts are plain numbers, not strings.
tax equals gst_hst plus pst_qst, and total equals subtotal plus tax.
When a value cannot be found use "" for text and 0 for amounts.
When only a date is printed, use T00:00:00Z as its time."#;

/// Extraction through the Gemini `generateContent` API.
pub struct GeminiExtractor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(serde::Serialize)]
struct Request<'a> {
    contents: [Content<'a>; 1],
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(serde::Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl Response {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn request_body(image: &Image) -> Request<'_> {
    let data = base64::engine::general_purpose::STANDARD.encode(image.bytes());
    Request {
        contents: [Content {
            parts: [
                Part::Text { text: PROMPT },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.content_type(),
                        data,
                    },
                },
            ],
        }],
    }
}

impl GeminiExtractor {
    pub fn new(config: &base::ExtractorConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl base::Extractor for GeminiExtractor {
    #[tracing::instrument(
        name = "gemini_extract",
        skip_all,
        fields(model = %self.model, mime = image.content_type(), bytes = image.bytes().len())
    )]
    async fn extract(&self, image: &Image) -> Result<ExtractedFields, ExtractionError> {
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(image))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "extraction request rejected");
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.json::<Response>().await?.text();
        tracing::debug!(chars = text.len(), "model responded");
        parse_answer(&text)
    }
}

/// Parses the candidate text. Blocked or empty candidates carry no text.
fn parse_answer(text: &str) -> Result<ExtractedFields, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }
    base::extract::parse_response(text)
}
