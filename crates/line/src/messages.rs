//! Outbound reply model.
//!
//! Serializes to the exact shapes the reply endpoint accepts. Template
//! kinds use the platform's wire names, which are not uniformly cased
//! (`image_carousel` next to `buttons`).

use serde::Serialize;

/// One message in a reply batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Text { text: String },
    #[serde(rename_all = "camelCase")]
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        original_content_url: String,
        /// Length in milliseconds.
        duration: u64,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        original_content_url: String,
        preview_image_url: String,
        /// Echoed back by the videoPlayComplete event.
        tracking_id: String,
    },
    Location {
        title: String,
        address: String,
        latitude: f64,
        longitude: f64,
    },
    #[serde(rename_all = "camelCase")]
    Imagemap {
        base_url: String,
        alt_text: String,
        base_size: BaseSize,
        actions: Vec<ImagemapAction>,
    },
    #[serde(rename_all = "camelCase")]
    Template {
        alt_text: String,
        template: Template,
    },
}

impl OutboundMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn sticker(package_id: impl Into<String>, sticker_id: impl Into<String>) -> Self {
        Self::Sticker {
            package_id: package_id.into(),
            sticker_id: sticker_id.into(),
        }
    }

    #[must_use]
    pub fn image(original: impl Into<String>, preview: impl Into<String>) -> Self {
        Self::Image {
            original_content_url: original.into(),
            preview_image_url: preview.into(),
        }
    }

    #[must_use]
    pub fn template(alt_text: impl Into<String>, template: Template) -> Self {
        Self::Template {
            alt_text: alt_text.into(),
            template,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Template {
    #[serde(rename = "buttons", rename_all = "camelCase")]
    Buttons {
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail_image_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
        actions: Vec<Action>,
    },
    #[serde(rename = "confirm")]
    Confirm { text: String, actions: Vec<Action> },
    #[serde(rename = "carousel")]
    Carousel { columns: Vec<CarouselColumn> },
    #[serde(rename = "image_carousel")]
    ImageCarousel { columns: Vec<ImageCarouselColumn> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselColumn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCarouselColumn {
    pub image_url: String,
    pub action: Action,
}

impl ImageCarouselColumn {
    #[must_use]
    pub fn new(image_url: impl Into<String>, action: Action) -> Self {
        Self {
            image_url: image_url.into(),
            action,
        }
    }
}

/// Tappable action attached to templates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Uri { label: String, uri: String },
    Message { label: String, text: String },
    #[serde(rename_all = "camelCase")]
    Postback {
        label: String,
        data: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    Datetimepicker {
        label: String,
        data: String,
        /// `date`, `time` or `datetime`.
        mode: String,
    },
}

impl Action {
    #[must_use]
    pub fn uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::Uri {
            label: label.into(),
            uri: uri.into(),
        }
    }

    #[must_use]
    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BaseSize {
    pub width: u32,
    pub height: u32,
}

/// Tappable region of an imagemap.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ImagemapAction {
    #[serde(rename_all = "camelCase")]
    Uri {
        link_uri: String,
        area: ImagemapArea,
    },
    Message { text: String, area: ImagemapArea },
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImagemapArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn wire(message: &OutboundMessage) -> serde_json::Value {
        serde_json::to_value(message).expect("serialize message")
    }

    #[test]
    fn text_message_wire_shape() {
        assert_eq!(
            wire(&OutboundMessage::text("hello")),
            json!({ "type": "text", "text": "hello" })
        );
    }

    #[test]
    fn sticker_message_wire_shape() {
        assert_eq!(
            wire(&OutboundMessage::sticker("11537", "52002734")),
            json!({ "type": "sticker", "packageId": "11537", "stickerId": "52002734" })
        );
    }

    #[test]
    fn image_message_wire_shape() {
        assert_eq!(
            wire(&OutboundMessage::image(
                "https://host/downloaded/a.jpg",
                "https://host/downloaded/a-preview.jpg"
            )),
            json!({
                "type": "image",
                "originalContentUrl": "https://host/downloaded/a.jpg",
                "previewImageUrl": "https://host/downloaded/a-preview.jpg"
            })
        );
    }

    #[test]
    fn video_message_includes_tracking_id() {
        let msg = OutboundMessage::Video {
            original_content_url: "https://host/downloaded/v.mp4".into(),
            preview_image_url: "https://host/downloaded/v-preview.jpg".into(),
            tracking_id: "track-9".into(),
        };
        assert_eq!(
            wire(&msg),
            json!({
                "type": "video",
                "originalContentUrl": "https://host/downloaded/v.mp4",
                "previewImageUrl": "https://host/downloaded/v-preview.jpg",
                "trackingId": "track-9"
            })
        );
    }

    #[test]
    fn buttons_template_wire_shape() {
        let msg = OutboundMessage::template(
            "My github: https://github.com/ericlin03",
            Template::Buttons {
                thumbnail_image_url: Some("https://host/static/buttons/9919.jpg".into()),
                title: Some("My github site".into()),
                text: "ericlin03".into(),
                actions: vec![Action::uri(
                    "Go to Eric's github",
                    "https://github.com/ericlin03",
                )],
            },
        );
        assert_eq!(
            wire(&msg),
            json!({
                "type": "template",
                "altText": "My github: https://github.com/ericlin03",
                "template": {
                    "type": "buttons",
                    "thumbnailImageUrl": "https://host/static/buttons/9919.jpg",
                    "title": "My github site",
                    "text": "ericlin03",
                    "actions": [
                        {
                            "type": "uri",
                            "label": "Go to Eric's github",
                            "uri": "https://github.com/ericlin03"
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn buttons_template_omits_absent_thumbnail_and_title() {
        let msg = OutboundMessage::template("alt", Template::Buttons {
            thumbnail_image_url: None,
            title: None,
            text: "pick one".into(),
            actions: vec![Action::message("Yes", "yes")],
        });
        let value = wire(&msg);
        let template = &value["template"];
        assert!(template.get("thumbnailImageUrl").is_none());
        assert!(template.get("title").is_none());
    }

    #[test]
    fn image_carousel_uses_snake_case_type() {
        let msg = OutboundMessage::template(
            "experience",
            Template::ImageCarousel {
                columns: vec![ImageCarouselColumn::new(
                    "https://host/static/experience/CTBC.jpg",
                    Action::message("CTBC Bank", "CTBC Bank"),
                )],
            },
        );
        assert_eq!(
            wire(&msg),
            json!({
                "type": "template",
                "altText": "experience",
                "template": {
                    "type": "image_carousel",
                    "columns": [
                        {
                            "imageUrl": "https://host/static/experience/CTBC.jpg",
                            "action": {
                                "type": "message",
                                "label": "CTBC Bank",
                                "text": "CTBC Bank"
                            }
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn confirm_and_carousel_wire_shapes() {
        let confirm = OutboundMessage::template("alt", Template::Confirm {
            text: "Do it?".into(),
            actions: vec![Action::message("Yes", "yes"), Action::message("No", "no")],
        });
        assert_eq!(wire(&confirm)["template"]["type"], "confirm");

        let carousel = OutboundMessage::template("alt", Template::Carousel {
            columns: vec![CarouselColumn {
                thumbnail_image_url: None,
                title: Some("Card".into()),
                text: "pick".into(),
                actions: vec![Action::Postback {
                    label: "Go".into(),
                    data: "action=go".into(),
                    display_text: None,
                }],
            }],
        });
        let value = wire(&carousel);
        assert_eq!(value["template"]["type"], "carousel");
        assert_eq!(
            value["template"]["columns"][0]["actions"][0],
            json!({ "type": "postback", "label": "Go", "data": "action=go" })
        );
    }

    #[test]
    fn imagemap_message_wire_shape() {
        let msg = OutboundMessage::Imagemap {
            base_url: "https://host/static/rich".into(),
            alt_text: "rich menu".into(),
            base_size: BaseSize {
                width: 1040,
                height: 1040,
            },
            actions: vec![
                ImagemapAction::Uri {
                    link_uri: "https://example.com".into(),
                    area: ImagemapArea {
                        x: 0,
                        y: 0,
                        width: 520,
                        height: 1040,
                    },
                },
                ImagemapAction::Message {
                    text: "hello".into(),
                    area: ImagemapArea {
                        x: 520,
                        y: 0,
                        width: 520,
                        height: 1040,
                    },
                },
            ],
        };
        assert_eq!(
            wire(&msg),
            json!({
                "type": "imagemap",
                "baseUrl": "https://host/static/rich",
                "altText": "rich menu",
                "baseSize": { "width": 1040, "height": 1040 },
                "actions": [
                    {
                        "type": "uri",
                        "linkUri": "https://example.com",
                        "area": { "x": 0, "y": 0, "width": 520, "height": 1040 }
                    },
                    {
                        "type": "message",
                        "text": "hello",
                        "area": { "x": 520, "y": 0, "width": 520, "height": 1040 }
                    }
                ]
            })
        );
    }

    #[test]
    fn datetimepicker_action_wire_shape() {
        let action = Action::Datetimepicker {
            label: "When".into(),
            data: "pick=when".into(),
            mode: "datetime".into(),
        };
        assert_eq!(
            serde_json::to_value(&action).expect("serialize action"),
            json!({
                "type": "datetimepicker",
                "label": "When",
                "data": "pick=when",
                "mode": "datetime"
            })
        );
    }
}
