pub mod gemini;

use crate::base;

/// Content type assumed for images that do not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Extracted amounts above a trillion dollars are treated as misreads.
pub const MAX_EXTRACTED_AMOUNT: base::Cents = base::Cents(100_000_000_000_000);

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction request failed")]
    Request(#[from] reqwest::Error),
    #[error("extraction service responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("extraction service returned no text")]
    EmptyResponse,
    #[error("model response contains no JSON object")]
    NoJsonObject,
    #[error("model response is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
}

/// A receipt image as uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    bytes: Vec<u8>,
    mime_type: Option<String>,
    reference: Option<String>,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: None,
            reference: None,
        }
    }

    /// Reads an image from disk. The content type is guessed from the file
    /// extension and the path is kept as the image reference.
    pub fn from_file(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            bytes,
            mime_type: guess_mime_type(path).map(str::to_string),
            reference: Some(path.display().to_string()),
        })
    }

    pub fn with_mime_type(self, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            ..self
        }
    }

    pub fn with_reference(self, reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..self
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared content type, or [`DEFAULT_MIME_TYPE`].
    pub fn content_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE)
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

pub fn guess_mime_type(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    })
}

/// Best-effort structured guess at a receipt's contents.
///
/// Deserialization never fails on a field: text that is missing or not a
/// string becomes empty, and amounts that are missing, not numeric or
/// larger than [`MAX_EXTRACTED_AMOUNT`] become zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    #[serde(deserialize_with = "text")]
    pub vendor_name: String,
    #[serde(rename = "receipt_no", deserialize_with = "text")]
    pub receipt_number: String,
    #[serde(deserialize_with = "text")]
    pub receipt_time: String,
    #[serde(deserialize_with = "amount")]
    pub subtotal: base::Cents,
    #[serde(deserialize_with = "amount")]
    pub gst_hst: base::Cents,
    #[serde(deserialize_with = "amount")]
    pub pst_qst: base::Cents,
    #[serde(deserialize_with = "amount")]
    pub tax: base::Cents,
    #[serde(deserialize_with = "amount")]
    pub total: base::Cents,
    #[serde(deserialize_with = "text")]
    pub payment: String,
    #[serde(rename = "chart_of_acct", deserialize_with = "text")]
    pub chart_of_account: String,
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;
    Ok(match v {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn amount<'de, D>(deserializer: D) -> Result<base::Cents, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;
    let x = match v {
        serde_json::Value::Number(n) => n.as_f64().and_then(base::Cents::from_f64),
        serde_json::Value::String(s) => s.parse::<base::Cents>().ok(),
        _ => None,
    }
    .unwrap_or_default();
    if x.0.unsigned_abs() > MAX_EXTRACTED_AMOUNT.0.unsigned_abs() {
        tracing::warn!(amount = %x, "ignored implausible amount");
        return Ok(base::Cents::ZERO);
    }
    Ok(x)
}

/// Turns an image into a structured guess at the receipt it shows. One
/// attempt per call.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, image: &Image) -> Result<ExtractedFields, ExtractionError>;
}

/// Returns the first balanced `{...}` substring of `s`. Braces inside JSON
/// strings are ignored.
pub fn find_json_object(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    for (start, _) in s.match_indices('{') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, &b) in bytes.iter().enumerate().skip(start) {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&s[start..=i]);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Parses the model's raw text answer.
pub fn parse_response(s: &str) -> Result<ExtractedFields, ExtractionError> {
    let object = find_json_object(s).ok_or(ExtractionError::NoJsonObject)?;
    serde_json::from_str(object).map_err(ExtractionError::InvalidJson)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("{}", Some("{}"))]
    #[case(r#"Here you go: {"a": 1} hope it helps"#, Some(r#"{"a": 1}"#))]
    #[case(r#"```json\n{"a": {"b": 2}}\n```"#, Some(r#"{"a": {"b": 2}}"#))]
    #[case(r#"{"vendor_name": "Brace } Co", "x": 1} {"y": 2}"#, Some(r#"{"vendor_name": "Brace } Co", "x": 1}"#))]
    #[case(r#"{"q": "say \"{\""}"#, Some(r#"{"q": "say \"{\""}"#))]
    #[case("{ unbalanced { {} tail", Some("{}"))]
    #[case("no json here", None)]
    #[case("} backwards {", None)]
    #[case("", None)]
    fn test_find_json_object(#[case] s: &str, #[case] want: Option<&str>) {
        assert_eq!(find_json_object(s), want)
    }

    #[test]
    fn test_parse_response() {
        let s = indoc! {r#"
            ```json
            {
              "vendor_name": "Corner Cafe",
              "receipt_no": 10442,
              "receipt_time": "2026-02-15T14:30:00Z",
              "subtotal": 18.5,
              "gst_hst": "0.93",
              "pst_qst": null,
              "tax": 0.93,
              "total": "$19.43",
              "payment": "Visa",
              "chart_of_acct": "Meals & Entertainment",
              "status": "verified"
            }
            ```
        "#};
        let got = parse_response(s).unwrap();
        assert_eq!(
            got,
            ExtractedFields {
                vendor_name: "Corner Cafe".into(),
                receipt_number: "10442".into(),
                receipt_time: "2026-02-15T14:30:00Z".into(),
                subtotal: base::Cents(1850),
                gst_hst: base::Cents(93),
                pst_qst: base::Cents(0),
                tax: base::Cents(93),
                total: base::Cents(1943),
                payment: "Visa".into(),
                chart_of_account: "Meals & Entertainment".into(),
            }
        );
    }

    #[test]
    fn test_parse_response_defaults() {
        let got = parse_response(r#"{"subtotal": "n/a", "vendor_name": ["x"]}"#).unwrap();
        assert_eq!(got, ExtractedFields::default());
    }

    #[rstest]
    #[case(r#"{"total": 1000000000000}"#, base::Cents(100_000_000_000_000))]
    #[case(r#"{"total": 1000000000000.01}"#, base::Cents::ZERO)]
    #[case(r#"{"total": "-2,000,000,000,000"}"#, base::Cents::ZERO)]
    #[case(r#"{"total": 1e300}"#, base::Cents::ZERO)]
    fn test_parse_response_amount_ceiling(#[case] s: &str, #[case] want: base::Cents) {
        assert_eq!(parse_response(s).unwrap().total, want)
    }

    #[rstest]
    #[case("", "model response contains no JSON object")]
    #[case("   ", "model response contains no JSON object")]
    #[case("I could not read this receipt.", "model response contains no JSON object")]
    #[case("{vendor: Cafe}", "model response is not valid JSON")]
    fn test_parse_response_failing(#[case] s: &str, #[case] want: &str) {
        assert_eq!(parse_response(s).unwrap_err().to_string(), want)
    }

    #[rstest]
    #[case("receipt.JPG", Some("image/jpeg"))]
    #[case("a/b/receipt.png", Some("image/png"))]
    #[case("scan.heic", Some("image/heic"))]
    #[case("scan.pdf", None)]
    #[case("scan", None)]
    fn test_guess_mime_type(#[case] path: &str, #[case] want: Option<&str>) {
        assert_eq!(guess_mime_type(std::path::Path::new(path)), want)
    }

    #[test]
    fn test_image_content_type() {
        let image = Image::new(vec![1, 2, 3]);
        assert_eq!(image.content_type(), DEFAULT_MIME_TYPE);
        assert_eq!(image.with_mime_type("image/png").content_type(), "image/png");
    }

    #[test]
    fn test_image_from_file() {
        let td = tempfile::TempDir::new().unwrap();
        let path = td.path().join("r.webp");
        std::fs::write(&path, b"RIFF").unwrap();
        let image = Image::from_file(&path).unwrap();
        assert_eq!(image.bytes(), b"RIFF");
        assert_eq!(image.content_type(), "image/webp");
        assert_eq!(image.reference(), Some(path.display().to_string().as_str()));
    }
}
