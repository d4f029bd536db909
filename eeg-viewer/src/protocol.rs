//! JSON messages exchanged with the acquisition server.
//!
//! Every inbound field is optional and any subset may arrive together; the
//! receiver applies only what is present. The only message the viewer sends
//! is the name of the stream the user picked.

use app_core::string_error::ErrorStringExt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StreamDescriptor {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub streams: Option<Vec<StreamDescriptor>>,
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    #[serde(default)]
    pub data: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub timestamps: Option<Vec<f64>>,
    #[serde(default)]
    pub selected_channels: Option<Vec<String>>,
    /// Sent by the server when it cannot serve a request.
    #[serde(default)]
    pub error: Option<String>,
}

/// The three parallel arrays making up a frame, only available when all of
/// them were part of the message.
pub struct WireFrame {
    pub data: Vec<Vec<f64>>,
    pub timestamps: Vec<f64>,
    pub selected_channels: Vec<String>,
}

impl InboundMessage {
    /// Moves the frame out of the message if it is complete.
    pub fn take_frame(&mut self) -> Option<WireFrame> {
        if self.data.is_none() || self.timestamps.is_none() || self.selected_channels.is_none() {
            return None;
        }
        Some(WireFrame {
            data: self.data.take()?,
            timestamps: self.timestamps.take()?,
            selected_channels: self.selected_channels.take()?,
        })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.streams.is_none()
            && self.channels.is_none()
            && self.data.is_none()
            && self.timestamps.is_none()
            && self.selected_channels.is_none()
            && self.error.is_none()
    }
}

/// Parse the text of an inbound message.
///
/// A valid JSON value that is not an object carries no fields and yields an
/// empty message. A known field holding the wrong type is an error.
pub fn parse_inbound(text: &str) -> Result<InboundMessage, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).err_to_string("inbound message is not valid JSON")?;
    if !value.is_object() {
        log::debug!("inbound message is not a JSON object, ignoring its content");
        return Ok(InboundMessage::default());
    }
    serde_json::from_value(value).err_to_string("inbound message has an unexpected shape")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub stream_name: String,
}

impl OutboundMessage {
    pub fn select_stream(name: &str) -> Self {
        Self {
            stream_name: name.to_owned(),
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).err_to_string("could not serialize outbound message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_message() {
        let msg = parse_inbound(r#"{"channels": ["Fz", "Cz"]}"#).unwrap();
        assert_eq!(msg.channels, Some(vec!["Fz".to_string(), "Cz".to_string()]));
        assert!(msg.streams.is_none());
        assert!(msg.data.is_none());
    }

    #[test]
    fn test_parse_streams_ignores_extra_fields() {
        let msg = parse_inbound(r#"{"streams": [{"name": "EEG", "type": "EEG"}]}"#).unwrap();
        assert_eq!(
            msg.streams,
            Some(vec![StreamDescriptor {
                name: "EEG".into()
            }])
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let msg = parse_inbound(r#"{"streams": null, "channels": []}"#).unwrap();
        assert!(msg.streams.is_none());
        assert_eq!(msg.channels, Some(vec![]));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_inbound("{not json").is_err());
        assert!(parse_inbound("").is_err());
    }

    #[test]
    fn test_wrong_field_type_is_an_error() {
        assert!(parse_inbound(r#"{"channels": "Fz"}"#).is_err());
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(parse_inbound("[1, 2, 3]").unwrap().is_empty());
        assert!(parse_inbound("42").unwrap().is_empty());
    }

    #[test]
    fn test_take_frame_requires_all_three_fields() {
        let mut msg = parse_inbound(r#"{"data": [[1.0]], "timestamps": [0.5]}"#).unwrap();
        assert!(msg.take_frame().is_none());
        // nothing was moved out
        assert!(msg.data.is_some());

        let mut msg = parse_inbound(
            r#"{"data": [[1.0]], "timestamps": [0.5], "selected_channels": ["Fz"]}"#,
        )
        .unwrap();
        let frame = msg.take_frame().unwrap();
        assert_eq!(frame.selected_channels, vec!["Fz".to_string()]);
        assert!(msg.data.is_none());
    }

    #[test]
    fn test_outbound_message_json() {
        let json = OutboundMessage::select_stream("EEG-1").to_json().unwrap();
        assert_eq!(json, r#"{"stream_name":"EEG-1"}"#);
    }
}
