use tokio_tungstenite::tungstenite::Message;

/// One discrete unit of data exchanged with the streaming transport.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text frame, carrying a JSON document for this protocol
    Text(String),
    /// Binary data frame
    Binary(Vec<u8>),
    /// PING control frame
    Ping(Vec<u8>),
    /// PONG control frame
    Pong(Vec<u8>),
    /// The peer closed the connection
    Close,
}

impl Frame {
    /// PING control frame with an empty payload.
    #[must_use]
    pub const fn ping() -> Self {
        Self::Ping(Vec::new())
    }

    /// PONG control frame with an empty payload.
    #[must_use]
    pub const fn pong() -> Self {
        Self::Pong(Vec::new())
    }

    /// Frame type tag, as used in log output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::Ping(_) => "ping",
            Self::Pong(_) => "pong",
            Self::Close => "close",
        }
    }

    /// Raw payload bytes of the frame.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(data) | Self::Ping(data) | Self::Pong(data) => data,
            Self::Close => &[],
        }
    }
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Text(text.as_str().to_owned()),
            Message::Ping(data) => Self::Ping(data.to_vec()),
            Message::Pong(data) => Self::Pong(data.to_vec()),
            Message::Close(_) => Self::Close,
            // Binary and raw frames are both opaque to this protocol
            other => Self::Binary(other.into_data().to_vec()),
        }
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
            Frame::Ping(data) => Message::Ping(data.into()),
            Frame::Pong(data) => Message::Pong(data.into()),
            Frame::Close => Message::Close(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_frames_have_empty_payload() {
        assert_eq!(Frame::ping(), Frame::Ping(Vec::new()));
        assert!(Frame::pong().data().is_empty());
    }

    #[test]
    fn kind_tags_match_frame_types() {
        assert_eq!(Frame::Text("{}".to_owned()).kind(), "text");
        assert_eq!(Frame::Binary(vec![1]).kind(), "binary");
        assert_eq!(Frame::ping().kind(), "ping");
        assert_eq!(Frame::pong().kind(), "pong");
        assert_eq!(Frame::Close.kind(), "close");
    }

    #[test]
    fn tungstenite_messages_convert() {
        assert_eq!(
            Frame::from(Message::Text("{\"type\":\"hello\"}".into())),
            Frame::Text("{\"type\":\"hello\"}".to_owned())
        );
        assert_eq!(Frame::from(Message::Close(None)), Frame::Close);
        assert_eq!(
            Frame::from(Message::Binary(vec![1_u8, 2, 3].into())),
            Frame::Binary(vec![1, 2, 3])
        );
        assert!(matches!(Message::from(Frame::ping()), Message::Ping(data) if data.is_empty()));
    }
}
