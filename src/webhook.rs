//! Webhook server — receives LINE platform events.
//!
//! `POST /callback` validates the `x-line-signature` header (HMAC-SHA256 of
//! the raw body with the channel secret, base64-encoded) before anything is
//! parsed. Text messages from the allowed source are routed to the controller;
//! everything else is acknowledged and dropped.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use tower_http::trace::TraceLayer;

use crate::channels::Notifier;
use crate::controller::ReminderController;

type HmacSha256 = Hmac<Sha256>;

/// Messages that request the current week's summary instead of registering.
const SUMMARY_COMMANDS: [&str; 2] = ["予定表", "今週の予定表"];

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub controller: Arc<ReminderController>,
    pub notifier: Arc<dyn Notifier>,
    pub channel_secret: SecretString,
    /// Sender user ID honored for registration/queries; `*` accepts anyone.
    pub allowed_source: String,
}

/// Build the webhook routes.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// POST /callback — the LINE webhook endpoint.
async fn callback(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_signature(state.channel_secret.expose_secret(), &body, signature) {
        tracing::warn!("Rejected webhook call with invalid signature");
        return StatusCode::BAD_REQUEST;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            // Signature was valid, so this came from the platform; log and ack.
            tracing::warn!("Unparseable webhook payload: {e}");
            return StatusCode::OK;
        }
    };

    for event in payload.events {
        handle_event(&state, event).await;
    }

    StatusCode::OK
}

async fn handle_event(state: &WebhookState, event: WebhookEvent) {
    if event.kind != "message" {
        tracing::debug!(kind = %event.kind, "Ignoring non-message event");
        return;
    }
    let Some(message) = event.message else { return };
    if message.kind != "text" {
        return;
    }
    let Some(text) = message.text else { return };

    let sender = event
        .source
        .as_ref()
        .and_then(|s| s.user_id.as_deref())
        .unwrap_or("unknown");
    if state.allowed_source != "*" && state.allowed_source != sender {
        tracing::warn!(sender, "Ignoring message from unauthorized source");
        return;
    }

    let reply = if is_summary_query(&text) {
        state.controller.on_summary_query().await
    } else {
        state
            .controller
            .on_roster_message(&text)
            .await
            .map(|(_, reply)| reply)
    };

    let reply = match reply {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Failed to handle inbound message: {e}");
            return;
        }
    };

    if let Some(token) = event.reply_token.as_deref() {
        if let Err(e) = state.notifier.reply(token, &reply).await {
            tracing::error!("Failed to send reply: {e}");
        }
    }
}

/// Whether the text asks for the weekly summary.
fn is_summary_query(text: &str) -> bool {
    SUMMARY_COMMANDS.contains(&text.trim())
}

/// Compute the base64 HMAC-SHA256 signature for a webhook body.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    // Key length is unconstrained for HMAC; new_from_slice cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(body);
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Validate a webhook signature header (constant-time on the MAC bytes).
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "replyToken")]
    reply_token: Option<String>,
    source: Option<EventSource>,
    message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
struct EventSource {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let body = br#"{"events":[]}"#;
        let sig = compute_signature("secret", body);
        assert!(verify_signature("secret", body, &sig));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let sig = compute_signature("secret", b"original");
        assert!(!verify_signature("secret", b"tampered", &sig));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let sig = compute_signature("secret", b"body");
        assert!(!verify_signature("other", b"body", &sig));
    }

    #[test]
    fn garbage_signature_header_fails() {
        assert!(!verify_signature("secret", b"body", "not base64 ###"));
        assert!(!verify_signature("secret", b"body", ""));
    }

    #[test]
    fn summary_command_matching() {
        assert!(is_summary_query("予定表"));
        assert!(is_summary_query(" 今週の予定表 "));
        assert!(!is_summary_query("救急\nA"));
        assert!(!is_summary_query("予定表を見せて"));
    }

    #[test]
    fn webhook_payload_deserializes() {
        let json = r#"{
            "destination": "U000",
            "events": [{
                "type": "message",
                "replyToken": "token123",
                "source": {"type": "group", "groupId": "G1", "userId": "U1"},
                "message": {"id": "m1", "type": "text", "text": "救急"}
            }]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.events.len(), 1);
        let event = &payload.events[0];
        assert_eq!(event.kind, "message");
        assert_eq!(event.reply_token.as_deref(), Some("token123"));
        assert_eq!(
            event.source.as_ref().unwrap().user_id.as_deref(),
            Some("U1")
        );
        assert_eq!(
            event.message.as_ref().unwrap().text.as_deref(),
            Some("救急")
        );
    }

    #[test]
    fn non_text_events_deserialize_without_message_fields() {
        let json = r#"{"events":[{"type":"join","source":{"type":"group","groupId":"G1"}}]}"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert!(payload.events[0].message.is_none());
    }
}
