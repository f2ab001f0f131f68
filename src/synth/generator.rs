use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::synth::artifact::ArtifactKind;

/// The text-generation collaborator: one instruction in, one response out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String>;
}

// ============================================================================
// Ollama Backend
// ============================================================================

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    client: reqwest::Client,
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL, DEFAULT_TEMPERATURE)
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(endpoint: &str, model: &str, temperature: f32) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            temperature,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, instruction: &str) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt: instruction,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SynthError::Backend(format!("Ollama request to {} failed: {}", self.endpoint, e)))?;

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| SynthError::Backend(format!("Invalid Ollama response: {}", e)))?;

        Ok(body.response)
    }
}

// ============================================================================
// OpenAI-compatible Backend
// ============================================================================

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(endpoint: &str, model: &str, temperature: f32, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            temperature,
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, instruction: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: instruction,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SynthError::Backend(format!("OpenAI request to {} failed: {}", self.endpoint, e)))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SynthError::Backend(format!("Invalid OpenAI response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SynthError::Backend("OpenAI response had no content".into()))
    }
}

// ============================================================================
// Mock Backend (for testing without a model)
// ============================================================================

/// Canned, per-kind responses.
///
/// The kind is recovered from the artifact label in the instruction. Unless a
/// response is overridden, the canned content ends with the instruction's
/// `Input:` payload as a comment, so element names and the address appear in
/// the generated text the way a real model would echo them.
#[derive(Debug, Default)]
pub struct MockGenerator {
    responses: HashMap<ArtifactKind, String>,
    failing: Option<ArtifactKind>,
    delays: HashMap<ArtifactKind, Duration>,
    calls: Mutex<Vec<ArtifactKind>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, kind: ArtifactKind, response: &str) -> Self {
        self.responses.insert(kind, response.to_string());
        self
    }

    /// Fail every request for `kind` with a backend error.
    pub fn failing_on(mut self, kind: ArtifactKind) -> Self {
        self.failing = Some(kind);
        self
    }

    pub fn with_delay(mut self, kind: ArtifactKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Kinds requested so far, in call order.
    pub fn calls(&self) -> Vec<ArtifactKind> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn kind_of(instruction: &str) -> Option<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .find(|k| instruction.starts_with(&format!("Generate {} ", k.label())))
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, instruction: &str) -> Result<String> {
        let kind = Self::kind_of(instruction)
            .ok_or_else(|| SynthError::Backend("Mock cannot tell which artifact is requested".into()))?;

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(kind);
        }

        if let Some(delay) = self.delays.get(&kind) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing == Some(kind) {
            return Err(SynthError::Backend(format!("mock failure for {}", kind)));
        }

        if let Some(response) = self.responses.get(&kind) {
            return Ok(response.clone());
        }

        let input = instruction
            .lines()
            .find_map(|l| l.strip_prefix("Input: "))
            .unwrap_or("{}");

        Ok(format!("```\n{}\n/* {} */\n```", canned(kind), input))
    }
}

fn canned(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::PageObject => {
            "import BasePage from './BasePage.js';\n\n\
             export default class GeneratedPage extends BasePage {\n  \
             constructor(page) {\n    super(page);\n  }\n}"
        }
        ArtifactKind::Test => {
            "import { test, expect } from '@playwright/test';\n\n\
             test('page loads', async ({ page }) => {\n  \
             await expect(page).toHaveTitle(/.+/);\n});"
        }
        ArtifactKind::Feature => {
            "Feature: Generated coverage\n\n  \
             Scenario: Page loads\n    \
             Given I navigate to the page\n    \
             Then the page should be visible"
        }
        ArtifactKind::Steps => {
            "import { Given, When, Then } from '@cucumber/cucumber';\n\n\
             Given('I navigate to the page', async function () {});\n\
             When('I submit the form', async function () {});\n\
             Then('the page should be visible', async function () {});"
        }
    }
}
