//! LLM proxy handlers: free-form chat, dictionary lookup, pronunciation
//! feedback. The server injects system prompts and the API key; clients
//! never talk to the provider directly.

use axum::extract::State;
use axum::Json;
use lingua_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::upstream::llm::ChatMessage;

const CHAT_SYSTEM_PROMPT: &str = "You are a friendly language tutor. Answer the learner's \
    questions about vocabulary, grammar, and usage concisely, with short examples.";

const DICTIONARY_SYSTEM_PROMPT: &str = "You are a bilingual dictionary. For the given word, \
    reply with its part of speech, a concise definition, a pronunciation guide, and two \
    example sentences with translations.";

const PRONUNCIATION_SYSTEM_PROMPT: &str = "You are a pronunciation coach. Compare the learner's \
    spoken transcript against the expected text, point out the words that differ, and give one \
    concrete tip for each mismatch.";

const ROLES: [&str; 3] = ["system", "user", "assistant"];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /llm/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Request body for `POST /llm/dictionary`.
#[derive(Debug, Deserialize)]
pub struct DictionaryRequest {
    pub word: String,
    /// Target language for definitions; defaults to English.
    pub language: Option<String>,
}

/// Request body for `POST /llm/pronunciation`.
#[derive(Debug, Deserialize)]
pub struct PronunciationRequest {
    /// The text the learner was asked to read.
    pub expected: String,
    /// Transcript of what the learner actually said.
    pub spoken: String,
}

/// Response body shared by all three proxy endpoints.
#[derive(Debug, Serialize)]
pub struct LlmResponse {
    pub reply: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/llm/chat
pub async fn chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<LlmResponse>> {
    if input.messages.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "messages must not be empty".into(),
        )));
    }
    for message in &input.messages {
        if !ROLES.contains(&message.role.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown message role: {}",
                message.role
            ))));
        }
    }

    let mut messages = vec![ChatMessage::system(CHAT_SYSTEM_PROMPT)];
    messages.extend(input.messages);

    let reply = state.llm.chat(&messages).await?;
    Ok(Json(LlmResponse { reply }))
}

/// POST /api/v1/llm/dictionary
pub async fn dictionary(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<DictionaryRequest>,
) -> AppResult<Json<LlmResponse>> {
    let word = input.word.trim();
    if word.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "word must not be empty".into(),
        )));
    }

    let language = input.language.as_deref().unwrap_or("English");
    let messages = [
        ChatMessage::system(DICTIONARY_SYSTEM_PROMPT),
        ChatMessage::user(format!("Word: {word}\nDefinition language: {language}")),
    ];

    let reply = state.llm.chat(&messages).await?;
    Ok(Json(LlmResponse { reply }))
}

/// POST /api/v1/llm/pronunciation
pub async fn pronunciation(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<PronunciationRequest>,
) -> AppResult<Json<LlmResponse>> {
    if input.expected.trim().is_empty() || input.spoken.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "expected and spoken must not be empty".into(),
        )));
    }

    let messages = [
        ChatMessage::system(PRONUNCIATION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Expected: {}\nSpoken: {}",
            input.expected, input.spoken
        )),
    ];

    let reply = state.llm.chat(&messages).await?;
    Ok(Json(LlmResponse { reply }))
}
