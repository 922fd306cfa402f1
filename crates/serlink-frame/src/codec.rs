use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{FrameConfig, FramingMode};
use crate::error::{FrameError, Result};

/// First byte of the sync marker.
pub const SYNC_FIRST: u8 = 0xFF;

/// Second byte of the sync marker.
pub const SYNC_SECOND: u8 = 0x55;

/// Sync marker preceding every packet.
pub const SYNC: [u8; 2] = [SYNC_FIRST, SYNC_SECOND];

/// Frame header: sync marker (2) + length (1) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Line ending written after each packet. Receivers skip it as inter-frame
/// noise.
pub const FRAME_TERMINATOR: &[u8] = b"\r\n";

/// One complete payload recovered from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Bytes this frame occupies on the wire in packet mode.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + FRAME_TERMINATOR.len()
    }
}

/// Encode a payload in packet format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬──────────────────┬────────────┐
/// │ Sync (2B)    │ Length   │ Payload          │ Terminator │
/// │ 0xFF 0x55    │ (1B)     │ (Length bytes)   │ "\r\n"     │
/// └──────────────┴──────────┴──────────────────┴────────────┘
/// ```
///
/// `dst` is left untouched on error.
pub fn encode_frame(payload: &[u8], mtu: usize, dst: &mut BytesMut) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload);
    }
    let max = mtu.min(crate::config::MAX_PACKET_MTU);
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len() + FRAME_TERMINATOR.len());
    dst.put_slice(&SYNC);
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    dst.put_slice(FRAME_TERMINATOR);
    Ok(())
}

/// Encode a payload according to `config`.
///
/// Stream mode copies the payload verbatim after the same MTU check.
pub fn encode(payload: &[u8], config: &FrameConfig, dst: &mut BytesMut) -> Result<()> {
    match config.mode() {
        FramingMode::Packet => encode_frame(payload, config.mtu(), dst),
        FramingMode::Stream => {
            if payload.len() > config.mtu() {
                return Err(FrameError::PayloadTooLarge {
                    size: payload.len(),
                    max: config.mtu(),
                });
            }
            dst.extend_from_slice(payload);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_header_payload_and_terminator() {
        let mut buf = BytesMut::new();
        encode_frame(b"hi!", 64, &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[0xFF, 0x55, 0x03, b'h', b'i', b'!', b'\r', b'\n']
        );
    }

    #[test]
    fn payload_at_mtu_accepted() {
        let mut buf = BytesMut::new();
        let payload = vec![0xA5; 16];
        encode_frame(&payload, 16, &mut buf).unwrap();

        assert_eq!(buf[2], 16);
        assert_eq!(buf.len(), Frame::new(payload).wire_size());
    }

    #[test]
    fn payload_over_mtu_rejected_without_output() {
        let mut buf = BytesMut::new();
        let err = encode_frame(&[0u8; 17], 16, &mut buf).unwrap_err();

        assert!(matches!(err, FrameError::PayloadTooLarge { size: 17, max: 16 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_payload_rejected() {
        let mut buf = BytesMut::new();
        let err = encode_frame(b"", 64, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::EmptyPayload));
        assert!(buf.is_empty());
    }

    #[test]
    fn full_length_byte_range() {
        let mut buf = BytesMut::new();
        encode_frame(&[7u8; 255], 255, &mut buf).unwrap();
        assert_eq!(buf[2], 255);
    }

    #[test]
    fn appends_after_existing_bytes() {
        let mut buf = BytesMut::from(&b"xx"[..]);
        encode_frame(b"a", 64, &mut buf).unwrap();
        assert_eq!(&buf[..4], &[b'x', b'x', 0xFF, 0x55]);
    }

    #[test]
    fn stream_mode_is_verbatim() {
        let cfg = FrameConfig::stream(8).unwrap();
        let mut buf = BytesMut::new();

        encode(b"raw", &cfg, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"raw");

        let err = encode(&[0u8; 9], &cfg, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 9, max: 8 }));
        assert_eq!(buf.as_ref(), b"raw");
    }

    #[test]
    fn stream_mode_accepts_empty_payload() {
        let cfg = FrameConfig::stream(8).unwrap();
        let mut buf = BytesMut::new();
        encode(b"", &cfg, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn frame_accessors() {
        let frame = Frame::new(Bytes::from_static(b"test"));
        assert_eq!(frame.len(), 4);
        assert!(!frame.is_empty());
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4 + 2);
    }
}
