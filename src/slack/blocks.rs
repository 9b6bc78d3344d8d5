use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextObject {
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageBlock {
    Divider,
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
}

impl MessageBlock {
    pub fn section_text(text: TextObject) -> Self {
        MessageBlock::Section {
            text: Some(text),
            fields: Vec::new(),
        }
    }

    pub fn section_fields(fields: Vec<TextObject>) -> Self {
        MessageBlock::Section { text: None, fields }
    }
}

/// Body POSTed to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub blocks: &'a [MessageBlock],
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn divider_serializes_as_type_only() {
        assert_eq!(
            serde_json::to_value(MessageBlock::Divider).unwrap(),
            json!({"type": "divider"})
        );
    }

    #[test]
    fn field_section_omits_text() {
        let block = MessageBlock::section_fields(vec![
            TextObject::mrkdwn("left"),
            TextObject::mrkdwn("right"),
        ]);

        assert_eq!(
            serde_json::to_value(block).unwrap(),
            json!({
                "type": "section",
                "fields": [
                    {"type": "mrkdwn", "text": "left"},
                    {"type": "mrkdwn", "text": "right"}
                ]
            })
        );
    }

    #[test]
    fn text_section_omits_fields() {
        let block = MessageBlock::section_text(TextObject::mrkdwn("hello"));

        assert_eq!(
            serde_json::to_value(block).unwrap(),
            json!({"type": "section", "text": {"type": "mrkdwn", "text": "hello"}})
        );
    }

    #[test]
    fn payload_wraps_blocks() {
        let blocks = [MessageBlock::Divider];
        let payload = WebhookPayload { blocks: &blocks };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"blocks": [{"type": "divider"}]})
        );
    }
}
