//! Career mentor chat.
//!
//! History lives in Redis under `chat:<email>` as a list of JSON turns,
//! trimmed to the most recent `MAX_HISTORY_TURNS` and expiring after the
//! configured idle TTL. Each new message is sent with the stored history.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::coaching::prompts::{build_mentor_system, CHAT_ERROR_REPLY, WELCOME_MESSAGE};
use crate::errors::AppError;
use crate::llm_client::{CallOptions, Content, LlmClient, LlmError, LlmResponse};

pub const MAX_HISTORY_TURNS: usize = 40;

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Mentor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn mentor(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Mentor,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: ChatTurn,
    /// True when the vendor call failed and the reply is the canned error text.
    pub degraded: bool,
}

pub fn history_key(email: &str) -> String {
    format!("chat:{email}")
}

pub fn welcome_turn() -> ChatTurn {
    ChatTurn::mentor(WELCOME_MESSAGE)
}

/// Trims the message and rejects blank or oversized input.
pub fn validate_message(raw: &str) -> Result<String, AppError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(message.to_string())
}

/// Maps stored turns onto vendor conversation contents. Blank turns are
/// skipped; the vendor rejects empty text parts.
pub fn to_contents(history: &[ChatTurn]) -> Vec<Content> {
    history
        .iter()
        .filter(|turn| !turn.text.trim().is_empty())
        .map(|turn| match turn.role {
            ChatRole::User => Content::user_text(turn.text.as_str()),
            ChatRole::Mentor => Content::model_text(turn.text.as_str()),
        })
        .collect()
}

/// Redis-backed per-email chat history.
#[derive(Clone)]
pub struct ChatStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl ChatStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    /// Stored turns, oldest first. Entries that no longer decode are skipped.
    pub async fn history(&self, email: &str) -> Result<Vec<ChatTurn>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Vec<String> = conn.lrange(history_key(email), 0, -1).await?;

        Ok(raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<ChatTurn>(entry) {
                Ok(turn) => Some(turn),
                Err(e) => {
                    warn!("Skipping undecodable chat turn for {email}: {e}");
                    None
                }
            })
            .collect())
    }

    /// Appends turns, keeps the newest `MAX_HISTORY_TURNS` and refreshes the TTL.
    pub async fn append(&self, email: &str, turns: &[ChatTurn]) -> Result<(), AppError> {
        let key = history_key(email);
        let mut pipe = redis::pipe();
        pipe.atomic();
        for turn in turns {
            let encoded = serde_json::to_string(turn).map_err(anyhow::Error::from)?;
            pipe.rpush(&key, encoded).ignore();
        }
        pipe.ltrim(&key, -(MAX_HISTORY_TURNS as isize), -1)
            .ignore()
            .expire(&key, self.ttl_secs as i64)
            .ignore();

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    pub async fn clear(&self, email: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.del(history_key(email)).await?;
        Ok(())
    }
}

/// Sends one message with the stored history as context.
///
/// A vendor failure or an answer without text yields the canned error reply
/// and leaves the history untouched. Storage failures propagate.
pub async fn send_message(
    store: &ChatStore,
    llm: &LlmClient,
    email: &str,
    message: &str,
) -> Result<ChatReply, AppError> {
    let message = validate_message(message)?;
    let history = store.history(email).await?;

    let user_turn = ChatTurn::user(message);
    let mut contents = to_contents(&history);
    contents.extend(to_contents(std::slice::from_ref(&user_turn)));

    let system = build_mentor_system();
    let options = CallOptions::default().with_system(&system);

    match mentor_text(llm.call(&contents, options).await) {
        Some(text) => {
            let reply = ChatTurn::mentor(text);
            store.append(email, &[user_turn, reply.clone()]).await?;
            info!("Chat turn stored for {email} ({} prior turns)", history.len());
            Ok(ChatReply {
                reply,
                degraded: false,
            })
        }
        None => Ok(ChatReply {
            reply: ChatTurn::mentor(CHAT_ERROR_REPLY),
            degraded: true,
        }),
    }
}

/// The mentor's answer, or `None` for failed, blocked or blank responses.
/// Stored turns always carry text.
pub fn mentor_text(result: Result<LlmResponse, LlmError>) -> Option<String> {
    match result {
        Ok(response) => {
            let text = response.text();
            if text.is_none() {
                warn!("Chat call returned no text");
            }
            text
        }
        Err(e) => {
            warn!("Chat call failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_key() {
        assert_eq!(history_key("dev@example.com"), "chat:dev@example.com");
    }

    #[test]
    fn test_validate_message_trims() {
        assert_eq!(validate_message("  How do I improve?  ").unwrap(), "How do I improve?");
    }

    #[test]
    fn test_validate_message_rejects_blank_and_oversized() {
        assert!(matches!(validate_message(" \n\t"), Err(AppError::Validation(_))));
        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(validate_message(&long).is_err());
    }

    #[test]
    fn test_to_contents_maps_roles() {
        let history = vec![ChatTurn::user("Hi"), ChatTurn::mentor("Hello"), ChatTurn::user("Resume tips?")];
        let contents = to_contents(&history);
        let roles: Vec<&str> = contents.iter().filter_map(|c| c.role.as_deref()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[1].parts[0].text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_to_contents_skips_blank_turns() {
        let history = vec![ChatTurn::user("Hi"), ChatTurn::mentor(""), ChatTurn::user("Still there?")];
        let contents = to_contents(&history);
        assert_eq!(contents.len(), 2);
        assert!(contents.iter().all(|c| c.role.as_deref() == Some("user")));
    }

    #[test]
    fn test_turn_serializes_camel_case() {
        let json = serde_json::to_value(welcome_turn()).unwrap();
        assert_eq!(json["role"], "mentor");
        assert!(json["text"].as_str().unwrap().starts_with("Welcome to SkillSync!"));
        assert!(json.get("sentAt").is_some());
    }

    #[test]
    fn test_turn_round_trips_through_storage_encoding() {
        let turn = ChatTurn::user("What should I learn next?");
        let stored = serde_json::to_string(&turn).unwrap();
        assert_eq!(serde_json::from_str::<ChatTurn>(&stored).unwrap(), turn);
    }

    #[test]
    fn test_mentor_text_rejects_blocked_candidate() {
        let blocked: LlmResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(mentor_text(Ok(blocked)).is_none());

        let blank: LlmResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"  "}]}}]}"#,
        )
        .unwrap();
        assert!(mentor_text(Ok(blank)).is_none());
    }

    #[test]
    fn test_mentor_text_keeps_answer() {
        let answer: LlmResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Ship a project."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(mentor_text(Ok(answer)).as_deref(), Some("Ship a project."));
    }

    #[test]
    fn test_mentor_text_on_error() {
        assert!(mentor_text(Err(LlmError::RateLimited { retries: 3 })).is_none());
    }
}
