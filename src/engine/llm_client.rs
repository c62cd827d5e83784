use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: String,
}

/// OpenAI-compatible chat endpoint (LM Studio and friends).
pub fn chat_completion(
    client: &Client,
    endpoint: &str,
    model: &str,
    system: &str,
    user: &str,
) -> Result<String> {
    let req = ChatCompletionRequest {
        model: model.to_string(),
        temperature: 0.75,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: system.to_string(),
            },
            ChatMessage {
                role: "user".into(),
                content: user.to_string(),
            },
        ],
    };

    let resp = client
        .post(endpoint)
        .json(&req)
        .send()?
        .error_for_status()?
        .json::<ChatCompletionResponse>()?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .context("chat response carried no choices")?;
    Ok(choice.message.content)
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

pub fn ollama_generate(client: &Client, endpoint: &str, model: &str, prompt: &str) -> Result<String> {
    let req = OllamaRequest {
        model,
        prompt,
        stream: false,
        format: "json",
    };

    let resp = client
        .post(endpoint)
        .json(&req)
        .send()?
        .error_for_status()?
        .json::<OllamaResponse>()?;

    if resp.response.trim().is_empty() {
        bail!("Ollama returned an empty response");
    }
    Ok(resp.response)
}
