use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode, Frame};
use crate::config::{FrameConfig, FramingMode};
use crate::error::FrameError;
use crate::receiver::FrameReceiver;

/// `tokio_util` codec running the same framing over async byte streams.
///
/// Decoding consumes every buffered byte it inspects; a partial frame is
/// held inside the receiver rather than left in the read buffer.
#[derive(Debug)]
pub struct SerialCodec {
    config: FrameConfig,
    receiver: FrameReceiver,
}

impl SerialCodec {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            receiver: FrameReceiver::new(config.mtu()),
        }
    }

    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }
}

impl Default for SerialCodec {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

impl Decoder for SerialCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        match self.config.mode() {
            FramingMode::Packet => {
                let (used, frame) = self.receiver.feed(src);
                src.advance(used);
                Ok(frame)
            }
            FramingMode::Stream => {
                if src.is_empty() {
                    return Ok(None);
                }
                let take = src.len().min(self.config.mtu());
                Ok(Some(Frame::new(src.split_to(take).freeze())))
            }
        }
    }
}

impl Encoder<&[u8]> for SerialCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), FrameError> {
        encode(item, &self.config, dst)
    }
}

impl Encoder<Bytes> for SerialCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode(&item, &self.config, dst)
    }
}

impl Encoder<Frame> for SerialCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode(&item.payload, &self.config, dst)
    }
}
