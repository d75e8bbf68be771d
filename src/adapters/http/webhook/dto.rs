//! Gateway webhook payloads.
//!
//! Each gateway posts its own envelope; both are decoded here into an
//! `InboundMessage` and nothing past this module sees gateway JSON.
//! Events that are not user messages decode to `None`.

use serde::Deserialize;

use crate::domain::foundation::{AccountId, MessageId, PhoneNumber, ValidationError};
use crate::domain::messaging::{optional_message_id, sender_of, InboundMessage, MessageContent};

// ════════════════════════════════════════════════════════════════════════════════
// WAHA
// ════════════════════════════════════════════════════════════════════════════════

/// WAHA event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WahaWebhook {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub payload: Option<WahaMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WahaMessage {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub media: Option<WahaMedia>,
    #[serde(default)]
    pub participant: Option<String>,
    #[serde(default)]
    pub reply_to: Option<WahaReplyTo>,
    #[serde(rename = "_data", default)]
    pub data: Option<WahaRawData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WahaMedia {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WahaReplyTo {
    #[serde(default)]
    pub id: Option<String>,
}

/// Engine-specific fields WAHA passes through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct WahaRawData {
    #[serde(rename = "quotedStanzaID", default)]
    pub quoted_stanza_id: Option<String>,
}

impl WahaWebhook {
    pub fn into_inbound(self) -> Result<Option<InboundMessage>, ValidationError> {
        if !matches!(self.event.as_str(), "message" | "message.any") {
            return Ok(None);
        }
        let Some(msg) = self.payload else {
            return Ok(None);
        };
        if msg.from_me {
            return Ok(None);
        }

        let account = PhoneNumber::new(&msg.to)?;
        let account_id = AccountId::new(account.as_str())?;
        let sender = sender_of(&msg.from, msg.participant.as_deref())?;
        let message_id = MessageId::new(msg.id)?;

        let media_url = msg
            .media
            .and_then(|m| m.url)
            .filter(|url| msg.has_media && !url.trim().is_empty());
        let content = match media_url {
            Some(media_url) => MessageContent::Image {
                caption: Some(msg.body).filter(|b| !b.trim().is_empty()),
                media_url,
            },
            None => MessageContent::Text { body: msg.body },
        };

        let quoted = msg
            .reply_to
            .and_then(|r| r.id)
            .or_else(|| msg.data.and_then(|d| d.quoted_stanza_id));

        let mut inbound = InboundMessage::text(account_id, msg.from, sender, message_id, "")
            .with_content(content);
        if let Some(quoted) = optional_message_id(quoted.as_deref()) {
            inbound = inbound.quoting(quoted);
        }
        if let Some(participant) = msg.participant.filter(|p| !p.trim().is_empty()) {
            inbound = inbound.with_participant(participant);
        }
        Ok(Some(inbound))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Baileys
// ════════════════════════════════════════════════════════════════════════════════

/// Baileys incoming-message envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysWebhook {
    pub session_id: String,
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub message: BaileysMessageBody,
    pub key: BaileysMessageKey,
    /// Download URL for media, when the gateway stored it.
    #[serde(default)]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysMessageKey {
    pub remote_jid: String,
    pub id: String,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub participant: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysMessageBody {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text_message: Option<BaileysExtendedText>,
    #[serde(default)]
    pub image_message: Option<BaileysImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysExtendedText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub context_info: Option<BaileysContextInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysImage {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub context_info: Option<BaileysContextInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaileysContextInfo {
    #[serde(default)]
    pub stanza_id: Option<String>,
}

impl BaileysWebhook {
    pub fn into_inbound(self) -> Result<Option<InboundMessage>, ValidationError> {
        if self.key.from_me {
            return Ok(None);
        }

        let BaileysMessageBody {
            conversation,
            extended_text_message,
            image_message,
        } = self.message;

        let (content, context) = if let Some(image) = image_message {
            let Some(media_url) = self
                .media_url
                .or(image.url)
                .filter(|url| !url.trim().is_empty())
            else {
                return Ok(None);
            };
            let caption = image.caption.filter(|c| !c.trim().is_empty());
            (MessageContent::Image { caption, media_url }, image.context_info)
        } else if let Some(extended) = extended_text_message {
            (
                MessageContent::Text {
                    body: extended.text,
                },
                extended.context_info,
            )
        } else if let Some(body) = conversation {
            (MessageContent::Text { body }, None)
        } else {
            return Ok(None);
        };

        let account_id = AccountId::new(self.session_id)?;
        let sender = sender_of(&self.key.remote_jid, self.key.participant.as_deref())?;
        let message_id = MessageId::new(self.key.id)?;
        let quoted = context.and_then(|c| c.stanza_id);

        let mut inbound =
            InboundMessage::text(account_id, self.key.remote_jid, sender, message_id, "")
                .with_content(content);
        if let Some(quoted) = optional_message_id(quoted.as_deref()) {
            inbound = inbound.quoting(quoted);
        }
        if let Some(participant) = self.key.participant.filter(|p| !p.trim().is_empty()) {
            inbound = inbound.with_participant(participant);
        }
        Ok(Some(inbound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn waha(payload: serde_json::Value) -> WahaWebhook {
        serde_json::from_value(json!({
            "event": "message",
            "session": "default",
            "payload": payload
        }))
        .unwrap()
    }

    fn baileys(value: serde_json::Value) -> BaileysWebhook {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn waha_text_message_decodes() {
        let inbound = waha(json!({
            "id": "false_628123@c.us_AAA",
            "from": "628123@c.us",
            "to": "628000@c.us",
            "body": "beli kopi 15000 #keuangan",
            "fromMe": false,
            "hasMedia": false
        }))
        .into_inbound()
        .unwrap()
        .unwrap();

        assert_eq!(inbound.account_id.as_str(), "628000");
        assert_eq!(inbound.chat_id, "628123@c.us");
        assert_eq!(inbound.sender.as_str(), "628123");
        assert_eq!(inbound.message_id.as_str(), "false_628123@c.us_AAA");
        assert!(!inbound.is_reply());
    }

    #[test]
    fn waha_reply_uses_reply_to_then_stanza_id() {
        let inbound = waha(json!({
            "id": "in-2",
            "from": "628123@c.us",
            "to": "628000@c.us",
            "body": "simpan",
            "replyTo": {"id": "out-1"}
        }))
        .into_inbound()
        .unwrap()
        .unwrap();
        assert_eq!(inbound.quoted_message_id.unwrap().as_str(), "out-1");

        let inbound = waha(json!({
            "id": "in-3",
            "from": "628123@c.us",
            "to": "628000@c.us",
            "body": "batal",
            "_data": {"quotedStanzaID": "out-9"}
        }))
        .into_inbound()
        .unwrap()
        .unwrap();
        assert_eq!(inbound.quoted_message_id.unwrap().as_str(), "out-9");
    }

    #[test]
    fn waha_media_message_is_image() {
        let inbound = waha(json!({
            "id": "in-4",
            "from": "628123@c.us",
            "to": "628000@c.us",
            "body": "#keuangan",
            "hasMedia": true,
            "media": {"url": "http://localhost:3000/api/files/a.jpg", "mimetype": "image/jpeg"}
        }))
        .into_inbound()
        .unwrap()
        .unwrap();

        match inbound.content {
            MessageContent::Image { caption, media_url } => {
                assert_eq!(caption.as_deref(), Some("#keuangan"));
                assert!(media_url.ends_with("a.jpg"));
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn waha_own_messages_and_other_events_are_skipped() {
        let own = waha(json!({
            "id": "out-1",
            "from": "628000@c.us",
            "to": "628123@c.us",
            "body": "ringkasan",
            "fromMe": true
        }));
        assert!(own.into_inbound().unwrap().is_none());

        let ack: WahaWebhook =
            serde_json::from_value(json!({"event": "message.ack", "payload": null})).unwrap();
        assert!(ack.into_inbound().unwrap().is_none());
    }

    #[test]
    fn baileys_conversation_decodes() {
        let inbound = baileys(json!({
            "sessionId": "acc-1",
            "from": "628123@s.whatsapp.net",
            "messageType": "conversation",
            "message": {"conversation": "makan 20000 #keuangan"},
            "timestamp": 1700000000,
            "key": {"remoteJid": "628123@s.whatsapp.net", "id": "B1", "fromMe": false}
        }))
        .into_inbound()
        .unwrap()
        .unwrap();

        assert_eq!(inbound.account_id.as_str(), "acc-1");
        assert_eq!(inbound.sender.as_str(), "628123");
        assert_eq!(inbound.body_text(), "makan 20000 #keuangan");
    }

    #[test]
    fn baileys_extended_text_carries_quote() {
        let inbound = baileys(json!({
            "sessionId": "acc-1",
            "messageType": "extendedTextMessage",
            "message": {"extendedTextMessage": {
                "text": "save",
                "contextInfo": {"stanzaId": "out-1", "participant": "628000@s.whatsapp.net"}
            }},
            "key": {
                "remoteJid": "1203630@g.us",
                "id": "B2",
                "participant": "628555@s.whatsapp.net"
            }
        }))
        .into_inbound()
        .unwrap()
        .unwrap();

        assert_eq!(inbound.quoted_message_id.unwrap().as_str(), "out-1");
        assert_eq!(inbound.sender.as_str(), "628555");
        assert_eq!(inbound.chat_id, "1203630@g.us");
        assert_eq!(inbound.participant.as_deref(), Some("628555@s.whatsapp.net"));
    }

    #[test]
    fn baileys_image_prefers_gateway_media_url() {
        let inbound = baileys(json!({
            "sessionId": "acc-1",
            "messageType": "imageMessage",
            "message": {"imageMessage": {"caption": "struk", "url": "https://mmg.whatsapp.net/x"}},
            "key": {"remoteJid": "628123@s.whatsapp.net", "id": "B3"},
            "mediaUrl": "http://localhost:3000/media/B3.jpg"
        }))
        .into_inbound()
        .unwrap()
        .unwrap();

        assert!(matches!(
            inbound.content,
            MessageContent::Image { ref media_url, .. } if media_url == "http://localhost:3000/media/B3.jpg"
        ));
    }

    #[test]
    fn baileys_unsupported_message_is_skipped() {
        let skipped = baileys(json!({
            "sessionId": "acc-1",
            "messageType": "stickerMessage",
            "message": {},
            "key": {"remoteJid": "628123@s.whatsapp.net", "id": "B4"}
        }));
        assert!(skipped.into_inbound().unwrap().is_none());
    }
}
