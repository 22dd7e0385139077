use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{AssistantService, ServiceError};
use crate::config::ServiceConfig;

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    analysis_model: String,
    notification_model: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn analysis_prompt(text: &str) -> String {
    format!(
        "Analyze this social interaction transcript for a person with Pathological Demand Avoidance (PDA).\n\
         Determine the 'stressAdjustment' (an integer from -20 to +50) representing the immediate impact on their nervous system arousal.\n\n\
         - High Positive (+20 to +50): Direct demands, threats, coercion, perceived loss of autonomy, injustice.\n\
         - Low Positive (+1 to +15): Indirect expectations, social pressure, complex questions.\n\
         - Neutral (0): Purely informational, low stakes.\n\
         - Negative (-1 to -20): Validation, autonomy support, co-regulation, safe language.\n\n\
         Transcript: \"{}\"",
        text
    )
}

fn notification_prompt(zone: &str) -> String {
    format!(
        "Generate a polite, professional, but firm 1-sentence notification to a manager stating that the employee is utilizing the \"{}\" for sensory regulation as per their workplace accommodation agreement. Do not include greetings.",
        zone
    )
}

fn analysis_schema() -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": {
                "isAggressive": { "type": "BOOLEAN", "description": "Whether the text contains aggressive or coercive content." },
                "severity": { "type": "NUMBER", "description": "Severity score from 0.0 to 1.0" },
                "reason": { "type": "STRING", "description": "Short explanation of the trigger or safety signal." },
                "stressAdjustment": { "type": "INTEGER", "description": "The estimated change in stress level (-20 to +50)." }
            },
            "required": ["isAggressive", "severity", "reason", "stressAdjustment"]
        }
    })
}

impl GeminiService {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            analysis_model: config.analysis_model.clone(),
            notification_model: config.notification_model.clone(),
        }
    }

    async fn generate(
        &self,
        model: &str,
        prompt: String,
        generation_config: Option<Value>,
    ) -> Result<String, ServiceError> {
        let key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        body.text()
            .ok_or_else(|| ServiceError::Malformed("empty candidate".to_string()))
    }
}

impl AssistantService for GeminiService {
    async fn analyze_transcript(&self, text: String) -> Result<Value, ServiceError> {
        let raw = self
            .generate(&self.analysis_model, analysis_prompt(&text), Some(analysis_schema()))
            .await?;
        debug!("Analysis response: {} bytes", raw.len());
        serde_json::from_str(raw.trim()).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    async fn generate_notification(&self, zone: String) -> Result<String, ServiceError> {
        let text = self
            .generate(&self.notification_model, notification_prompt(&zone), None)
            .await?;
        Ok(text.trim().to_string())
    }
}
