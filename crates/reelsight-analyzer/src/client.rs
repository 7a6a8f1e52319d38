//! Gemini API client for structured video analysis.
//!
//! Wraps the Files API (upload + readiness polling) and `generateContent`
//! with a schema-constrained JSON response. Callers get typed results: any
//! `T: DeserializeOwned + JsonSchema` can be requested and its schemars
//! schema is sent along as the response schema.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use reqwest::Client;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Readiness poll interval.
const POLL_INTERVAL_SECS: u64 = 2;

/// Readiness poll budget.
const POLL_BUDGET_SECS: u64 = 120;

/// Analyzer client configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// API key.
    pub api_key: String,
    /// API base URL (overridable for tests).
    pub base_url: String,
    /// Models to try, in order.
    pub models: Vec<String>,
    /// Readiness poll interval.
    pub poll_interval: Duration,
    /// Total readiness poll budget.
    pub poll_budget: Duration,
}

impl AnalyzerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> AnalyzerResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AnalyzerError::MissingApiKey)?;

        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            models: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-flash-lite".to_string(),
                "gemini-2.5-pro".to_string(),
            ],
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            poll_budget: Duration::from_secs(POLL_BUDGET_SECS),
        })
    }
}

/// A file uploaded to the analyzer, pending or ready for analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    /// URI to reference the file in generation requests.
    pub uri: String,
    /// Processing state: `PROCESSING`, `ACTIVE`, or `FAILED`.
    #[serde(default)]
    pub state: String,
    /// MIME type recorded at upload.
    #[serde(default)]
    pub mime_type: String,
}

impl RemoteFile {
    /// True once the file can be referenced by `generateContent`.
    pub fn is_active(&self) -> bool {
        self.state == "ACTIVE"
    }

    /// True while the analyzer is still ingesting the file.
    pub fn is_processing(&self) -> bool {
        self.state == "PROCESSING"
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Debug, Serialize)]
struct FileData {
    #[serde(rename = "fileUri")]
    file_uri: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseJsonSchema")]
    response_json_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini content-analyzer client.
pub struct GeminiClient {
    config: AnalyzerConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a client with explicit configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> AnalyzerResult<Self> {
        Ok(Self::new(AnalyzerConfig::from_env()?))
    }

    /// Upload a local video file to the analyzer.
    pub async fn upload_video(&self, path: impl AsRef<Path>) -> AnalyzerResult<RemoteFile> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());

        debug!(file = %file_name, size = bytes.len(), "Uploading video to analyzer");

        let metadata = serde_json::json!({ "file": { "display_name": file_name } });
        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part(
                "file",
                multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("video/mp4")?,
            );

        let url = format!(
            "{}/upload/v1beta/files?uploadType=multipart&key={}",
            self.config.base_url, self.config.api_key
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let response = check_status(response).await?;

        let upload: UploadResponse = response.json().await?;
        Ok(upload.file)
    }

    /// Poll the file's state until it leaves `PROCESSING`.
    ///
    /// Returns the refreshed file once `ACTIVE`. A terminal non-active state
    /// or an exhausted poll budget is an error: without an active file there
    /// is nothing to analyze.
    pub async fn wait_until_active(&self, file: &RemoteFile) -> AnalyzerResult<RemoteFile> {
        let mut current = file.clone();
        let mut waited = Duration::ZERO;

        while current.is_processing() {
            if waited >= self.config.poll_budget {
                return Err(AnalyzerError::PollTimeout(self.config.poll_budget.as_secs()));
            }
            tokio::time::sleep(self.config.poll_interval).await;
            waited += self.config.poll_interval;
            current = self.get_file(&current.name).await?;
        }

        if !current.is_active() {
            return Err(AnalyzerError::FileProcessing(current.state));
        }

        Ok(current)
    }

    /// Fetch the current state of an uploaded file.
    pub async fn get_file(&self, name: &str) -> AnalyzerResult<RemoteFile> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.base_url, name, self.config.api_key
        );
        let response = self.client.get(&url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Delete an uploaded file. Best-effort: failures are logged, not raised.
    pub async fn delete_file(&self, file: &RemoteFile) {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.base_url, file.name, self.config.api_key
        );
        match self.client.delete(&url).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(file = %file.name, status = %response.status(), "Failed to delete analyzer file");
            }
            Err(e) => warn!(file = %file.name, error = %e, "Failed to delete analyzer file"),
            _ => debug!(file = %file.name, "Deleted analyzer file"),
        }
    }

    /// Run schema-constrained generation against an active file.
    ///
    /// Tries each configured model in order, returning the first success.
    pub async fn generate<T>(&self, file: &RemoteFile, prompt: &str) -> AnalyzerResult<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        let mut last_error = None;

        for model in &self.config.models {
            info!(model = %model, "Requesting analyzer generation");
            match self.generate_with_model(model, file, prompt, schema.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(model = %model, error = %e, "Analyzer model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(AnalyzerError::AllModelsFailed))
    }

    /// Upload, wait for readiness, generate, and clean up the remote file.
    ///
    /// The uploaded file is deleted on every path, including failures.
    pub async fn analyze_video<T>(&self, path: impl AsRef<Path>, prompt: &str) -> AnalyzerResult<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let uploaded = self.upload_video(path).await?;

        let result = async {
            let active = self.wait_until_active(&uploaded).await?;
            self.generate::<T>(&active, prompt).await
        }
        .await;

        self.delete_file(&uploaded).await;
        result
    }

    async fn generate_with_model<T>(
        &self,
        model: &str,
        file: &RemoteFile,
        prompt: &str,
        schema: serde_json::Value,
    ) -> AnalyzerResult<T>
    where
        T: DeserializeOwned,
    {
        let mime_type = if file.mime_type.is_empty() {
            "video/mp4".to_string()
        } else {
            file.mime_type.clone()
        };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::File {
                        file_data: FileData {
                            file_uri: file.uri.clone(),
                            mime_type,
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_json_schema: schema,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let response = self.client.post(&url).json(&request).send().await?;
        let response = check_status(response).await?;

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or(AnalyzerError::EmptyResponse)?;

        Ok(serde_json::from_str(strip_code_fences(text))?)
    }
}

/// Map a non-success HTTP response to an API error with its body.
async fn check_status(response: reqwest::Response) -> AnalyzerResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AnalyzerError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Strip markdown code fences the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, JsonSchema)]
    struct TestReport {
        summary: String,
    }

    fn test_config(base_url: String) -> AnalyzerConfig {
        AnalyzerConfig {
            api_key: "test-key".to_string(),
            base_url,
            models: vec!["gemini-2.5-flash".to_string()],
            poll_interval: Duration::from_millis(10),
            poll_budget: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_generate_parses_fenced_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{"text": "```json\n{\"summary\": \"a reel\"}\n```"}]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri()));
        let file = RemoteFile {
            name: "files/abc".to_string(),
            uri: format!("{}/v1beta/files/abc", server.uri()),
            state: "ACTIVE".to_string(),
            mime_type: "video/mp4".to_string(),
        };

        let report: TestReport = client.generate(&file, "summarize").await.unwrap();
        assert_eq!(report.summary, "a reel");
    }

    #[tokio::test]
    async fn test_wait_until_active_polls_processing_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/abc",
                "uri": "https://example.com/files/abc",
                "state": "ACTIVE",
                "mimeType": "video/mp4"
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri()));
        let pending = RemoteFile {
            name: "files/abc".to_string(),
            uri: "https://example.com/files/abc".to_string(),
            state: "PROCESSING".to_string(),
            mime_type: String::new(),
        };

        let active = client.wait_until_active(&pending).await.unwrap();
        assert!(active.is_active());
    }

    #[tokio::test]
    async fn test_wait_until_active_rejects_failed_state() {
        let server = MockServer::start().await;
        let client = GeminiClient::new(test_config(server.uri()));

        let failed = RemoteFile {
            name: "files/abc".to_string(),
            uri: String::new(),
            state: "FAILED".to_string(),
            mime_type: String::new(),
        };

        let err = client.wait_until_active(&failed).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::FileProcessing(state) if state == "FAILED"));
    }

    #[tokio::test]
    async fn test_wait_until_active_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/files/slow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/slow",
                "uri": "https://example.com/files/slow",
                "state": "PROCESSING"
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri()));
        let pending = RemoteFile {
            name: "files/slow".to_string(),
            uri: String::new(),
            state: "PROCESSING".to_string(),
            mime_type: String::new(),
        };

        let err = client.wait_until_active(&pending).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::PollTimeout(_)));
    }

    #[tokio::test]
    async fn test_generate_api_error_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(server.uri()));
        let file = RemoteFile {
            name: "files/abc".to_string(),
            uri: String::new(),
            state: "ACTIVE".to_string(),
            mime_type: String::new(),
        };

        let err = client.generate::<TestReport>(&file, "x").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Api { status: 429, .. }));
    }
}
