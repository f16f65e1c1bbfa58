//! LINE channel — pushes and replies via the Messaging API.
//!
//! Native Rust LINE Messaging API client implementing the bot's `Notifier`
//! trait (push to the configured group, reply via reply token).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::channels::Notifier;
use crate::error::ChannelError;

/// Maximum text length accepted by LINE's message objects.
const LINE_MAX_MESSAGE_LENGTH: usize = 5000;

/// LINE channel — talks to `api.line.me` with a channel access token.
pub struct LineChannel {
    access_token: SecretString,
    client: reqwest::Client,
}

impl LineChannel {
    pub fn new(access_token: SecretString) -> Self {
        Self {
            access_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(method: &str) -> String {
        format!("https://api.line.me/v2/bot/message/{method}")
    }

    async fn post_messages(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(Self::api_url(method))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "line".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::Rejected {
                name: "line".into(),
                reason: format!("{method} returned {status}: {err}"),
            });
        }

        Ok(())
    }

    /// Build the `messages` array for a text, splitting to LINE's length cap.
    fn text_messages(text: &str) -> Vec<serde_json::Value> {
        split_message(text, LINE_MAX_MESSAGE_LENGTH)
            .into_iter()
            .map(|chunk| serde_json::json!({ "type": "text", "text": chunk }))
            .collect()
    }
}

#[async_trait]
impl Notifier for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    async fn push(&self, to: &str, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "to": to,
            "messages": Self::text_messages(text),
        });
        self.post_messages("push", body).await?;
        tracing::info!(to, "LINE push sent");
        Ok(())
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": Self::text_messages(text),
        });
        self.post_messages("reply", body).await
    }
}

/// Split a message into chunks that fit LINE's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts at a char boundary.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut end = max_len;
        while end > 0 && !remaining.is_char_boundary(end) {
            end -= 1;
        }

        let chunk = &remaining[..end];
        let split_at = chunk.rfind('\n').or_else(|| chunk.rfind(' ')).unwrap_or(end);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { end } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_channel_name() {
        let ch = LineChannel::new(SecretString::from("fake-token"));
        assert_eq!(ch.name(), "line");
    }

    #[test]
    fn line_api_urls() {
        assert_eq!(LineChannel::api_url("push"), "https://api.line.me/v2/bot/message/push");
        assert_eq!(LineChannel::api_url("reply"), "https://api.line.me/v2/bot/message/reply");
    }

    #[test]
    fn text_messages_short_is_single_object() {
        let msgs = LineChannel::text_messages("こんにちは");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["type"], "text");
        assert_eq!(msgs[0]["text"], "こんにちは");
    }

    #[test]
    fn split_message_short() {
        assert_eq!(split_message("Hello", 5000), vec!["Hello"]);
    }

    #[test]
    fn split_message_exact_limit() {
        let msg = "a".repeat(5000);
        let chunks = split_message(&msg, 5000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 5000);
    }

    #[test]
    fn split_message_over_limit_on_newline() {
        let msg = format!("{}\n{}", "a".repeat(3000), "b".repeat(3000));
        let chunks = split_message(&msg, 5000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(3000));
        assert_eq!(chunks[1], "b".repeat(3000));
    }

    #[test]
    fn split_message_no_good_split_point() {
        let msg = "a".repeat(6000);
        let chunks = split_message(&msg, 5000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 5000);
        assert_eq!(chunks[1].len(), 1000);
    }

    #[test]
    fn split_message_respects_char_boundaries() {
        // 3-byte chars; a naive byte cut would panic.
        let msg = "あ".repeat(40);
        let chunks = split_message(&msg, 100);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks.concat(), msg);
    }

    #[tokio::test]
    async fn push_with_fake_token_fails() {
        let ch = LineChannel::new(SecretString::from("fake-token"));
        let result = ch.push("C1234567890", "test").await;
        assert!(result.is_err());
    }
}
