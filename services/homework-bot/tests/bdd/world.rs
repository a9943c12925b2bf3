//! BDD test world for the homework bot

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cucumber::World;
use homework_bot::engine::{Outcome, PollLoop};
use homework_bot::io::{HttpClient, HttpResponse};
use homework_bot::{BotError, Credentials};
use serde_json::Value;

/// A GET request seen by [`ScriptedHttpClient`]
#[derive(Debug, Clone)]
pub struct RecordedGet {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

/// HTTP client replaying scripted API responses and recording chat messages
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    /// `None` simulates a transport failure
    pub api_responses: Mutex<VecDeque<Option<HttpResponse>>>,
    pub gets: Mutex<Vec<RecordedGet>>,
    pub chat_status: Mutex<Option<u16>>,
    pub sent_messages: Mutex<Vec<String>>,
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        self.gets.lock().unwrap().push(RecordedGet {
            url: url.to_string(),
            headers: owned(headers),
            query: owned(query),
        });

        let mut responses = self.api_responses.lock().unwrap();
        // The last scripted response repeats once the script runs out.
        let next = if responses.len() > 1 {
            responses.pop_front().flatten()
        } else {
            responses.front().cloned().flatten()
        };
        next.ok_or_else(|| BotError::Http("connection refused".to_string()))
    }

    async fn post_form(
        &self,
        _url: &str,
        params: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        if let Some((_, text)) = params.iter().find(|(k, _)| *k == "text") {
            self.sent_messages.lock().unwrap().push(text.to_string());
        }
        let status = self.chat_status.lock().unwrap().unwrap_or(200);
        Ok(HttpResponse {
            status,
            body: format!(r#"{{"ok":{}}}"#, status == 200),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct BotWorld {
    // Response validation and rendering
    pub response: Option<Value>,
    pub validation: Option<homework_bot::Result<Vec<Value>>>,
    pub record: Option<Value>,
    pub message: Option<homework_bot::Result<String>>,

    // Poll loop
    pub http: Arc<ScriptedHttpClient>,
    pub poll_loop: Option<PollLoop>,
    pub outcomes: Vec<Outcome>,

    // Startup
    pub env: HashMap<String, String>,
    pub credentials: Option<homework_bot::Result<Credentials>>,
}
