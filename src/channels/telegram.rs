//! Telegram channel — long-polls the Bot API for updates.
//!
//! Native Bot API implementation over reqwest. Text, location, and callback
//! query updates map onto [`ChatEvent`]; replies map onto sendMessage,
//! sendPhoto, and sendDocument with the matching keyboard markup.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::channels::{ChatChannel, ChatEvent, Choice, ConversationId, EventStream, Reply};
use crate::config::TelegramConfig;
use crate::error::ChannelError;

/// Telegram channel — connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: SecretString,
    api_url: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot_token: config.bot_token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_url,
            self.bot_token.expose_secret()
        )
    }

    /// POST a JSON-bodied Bot API method and verify it succeeded.
    async fn post_json(&self, method: &str, body: &Value) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("{method} failed ({status}): {err}"),
            });
        }

        Ok(())
    }

    /// POST a multipart Bot API method (photo/document uploads).
    async fn post_multipart(&self, method: &str, form: Form) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("{method} failed ({status}): {err}"),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<EventStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let bot_token = self.bot_token.clone();
        let api_url = self.api_url.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for updates...");

            loop {
                let url = format!(
                    "{}/bot{}/getUpdates",
                    api_url,
                    bot_token.expose_secret()
                );
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": 30,
                    "allowed_updates": ["message", "callback_query"]
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let Some(results) = data.get("result").and_then(Value::as_array) else {
                    continue;
                };

                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                        offset = uid + 1;
                    }

                    if let Some(message) = update.get("message") {
                        let Some(event) = parse_message_event(message) else {
                            continue;
                        };
                        if tx.send(event).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    } else if let Some(callback) = update.get("callback_query") {
                        let Some((callback_id, event)) = parse_callback_event(callback) else {
                            continue;
                        };

                        // Acknowledge the callback so the client stops its spinner
                        let answer_url = format!(
                            "{}/bot{}/answerCallbackQuery",
                            api_url,
                            bot_token.expose_secret()
                        );
                        let _ = client
                            .post(&answer_url)
                            .json(&serde_json::json!({ "callback_query_id": callback_id }))
                            .send()
                            .await;

                        if tx.send(event).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn send(&self, conversation: &ConversationId, reply: Reply) -> Result<(), ChannelError> {
        let chat_id = conversation.0.as_str();

        match reply {
            Reply::Text(text) => {
                let body = serde_json::json!({ "chat_id": chat_id, "text": text });
                self.post_json("sendMessage", &body).await
            }
            Reply::Choices { text, options } => {
                let body = serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "reply_markup": inline_keyboard(&options),
                });
                self.post_json("sendMessage", &body).await
            }
            Reply::LocationRequest { text, button } => {
                let body = serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "reply_markup": location_keyboard(&button),
                });
                self.post_json("sendMessage", &body).await
            }
            Reply::Photo { data, caption } => {
                let part = Part::bytes(data).file_name("forecast-chart.png");
                let mut form = Form::new()
                    .text("chat_id", chat_id.to_string())
                    .part("photo", part);
                if let Some(cap) = caption {
                    form = form.text("caption", cap);
                }
                self.post_multipart("sendPhoto", form).await
            }
            Reply::Document {
                data,
                file_name,
                caption,
            } => {
                let part = Part::bytes(data).file_name(file_name);
                let mut form = Form::new()
                    .text("chat_id", chat_id.to_string())
                    .part("document", part);
                if let Some(cap) = caption {
                    form = form.text("caption", cap);
                }
                self.post_multipart("sendDocument", form).await
            }
        }
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }
}

// ── Update parsing ──────────────────────────────────────────────────

/// Map a `message` update onto a [`ChatEvent`], if it carries text or a
/// location. Other content kinds are ignored.
fn parse_message_event(message: &Value) -> Option<ChatEvent> {
    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)?
        .to_string();

    if let Some(text) = message.get("text").and_then(Value::as_str) {
        return Some(ChatEvent::text(chat_id, text));
    }

    if let Some(location) = message.get("location") {
        let latitude = location.get("latitude").and_then(Value::as_f64)?;
        let longitude = location.get("longitude").and_then(Value::as_f64)?;
        return Some(ChatEvent::location(chat_id, latitude, longitude));
    }

    None
}

/// Map a `callback_query` update onto its id and a [`ChatEvent`].
fn parse_callback_event(callback: &Value) -> Option<(String, ChatEvent)> {
    let callback_id = callback.get("id").and_then(Value::as_str)?.to_string();
    let data = callback.get("data").and_then(Value::as_str)?;
    let chat_id = callback
        .get("message")
        .and_then(|m| m.get("chat"))
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)?
        .to_string();

    Some((callback_id, ChatEvent::callback(chat_id, data)))
}

// ── Keyboard markup ─────────────────────────────────────────────────

/// Inline keyboard with one choice per row.
fn inline_keyboard(options: &[Choice]) -> Value {
    let rows: Vec<Value> = options
        .iter()
        .map(|choice| {
            serde_json::json!([{ "text": choice.label, "callback_data": choice.data }])
        })
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// One-shot reply keyboard with a single share-location button.
fn location_keyboard(button: &str) -> Value {
    serde_json::json!({
        "keyboard": [[{ "text": button, "request_location": true }]],
        "resize_keyboard": true,
        "one_time_keyboard": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::EventKind;
    use serde_json::json;

    // ── Update parsing tests ────────────────────────────────────────

    #[test]
    fn text_message_maps_to_text_event() {
        let message = json!({
            "chat": { "id": 42 },
            "text": "Berlin"
        });
        let event = parse_message_event(&message).unwrap();
        assert_eq!(event.conversation.0, "42");
        assert_eq!(event.kind, EventKind::Text("Berlin".into()));
    }

    #[test]
    fn location_message_maps_to_location_event() {
        let message = json!({
            "chat": { "id": 42 },
            "location": { "latitude": 52.52, "longitude": 13.4 }
        });
        let event = parse_message_event(&message).unwrap();
        assert_eq!(
            event.kind,
            EventKind::Location {
                latitude: 52.52,
                longitude: 13.4
            }
        );
    }

    #[test]
    fn unsupported_message_content_is_ignored() {
        let message = json!({
            "chat": { "id": 42 },
            "sticker": { "file_id": "abc" }
        });
        assert!(parse_message_event(&message).is_none());
    }

    #[test]
    fn callback_query_maps_to_callback_event() {
        let callback = json!({
            "id": "cb-1",
            "data": "5",
            "message": { "chat": { "id": 42 } }
        });
        let (callback_id, event) = parse_callback_event(&callback).unwrap();
        assert_eq!(callback_id, "cb-1");
        assert_eq!(event.conversation.0, "42");
        assert_eq!(event.kind, EventKind::Callback("5".into()));
    }

    // ── Keyboard markup tests ───────────────────────────────────────

    #[test]
    fn inline_keyboard_puts_each_choice_on_its_own_row() {
        let markup = inline_keyboard(&[
            Choice {
                label: "1-day forecast".into(),
                data: "1".into(),
            },
            Choice {
                label: "5-day forecast".into(),
                data: "5".into(),
            },
        ]);
        let rows = markup["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0]["callback_data"], "1");
        assert_eq!(rows[1][0]["callback_data"], "5");
    }

    #[test]
    fn location_keyboard_requests_location_once() {
        let markup = location_keyboard("Share my location");
        assert_eq!(markup["keyboard"][0][0]["request_location"], true);
        assert_eq!(markup["one_time_keyboard"], true);
    }
}
