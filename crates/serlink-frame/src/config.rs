use crate::error::{FrameError, Result};

/// Largest MTU packet mode can express in its one-byte length field.
pub const MAX_PACKET_MTU: usize = 255;

/// Default maximum payload size in bytes.
pub const DEFAULT_MTU: usize = 64;

/// How payload boundaries are carried on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FramingMode {
    /// Sync marker, length byte, payload, terminator.
    #[default]
    Packet,
    /// Payload bytes verbatim; boundaries are the caller's problem.
    Stream,
}

/// Framing configuration. Always valid once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    mode: FramingMode,
    mtu: usize,
}

impl FrameConfig {
    /// Validate a mode/MTU combination.
    pub fn new(mode: FramingMode, mtu: usize) -> Result<Self> {
        if mtu == 0 {
            return Err(FrameError::ZeroMtu);
        }
        if mode == FramingMode::Packet && mtu > MAX_PACKET_MTU {
            return Err(FrameError::MtuTooLarge {
                mtu,
                max: MAX_PACKET_MTU,
            });
        }
        Ok(Self { mode, mtu })
    }

    pub fn packet(mtu: usize) -> Result<Self> {
        Self::new(FramingMode::Packet, mtu)
    }

    pub fn stream(mtu: usize) -> Result<Self> {
        Self::new(FramingMode::Stream, mtu)
    }

    /// Packet-mode configuration checked at compile time.
    ///
    /// `FrameConfig::packet_fixed::<300>()` does not build.
    pub const fn packet_fixed<const MTU: usize>() -> Self {
        const {
            assert!(
                MTU >= 1 && MTU <= MAX_PACKET_MTU,
                "packet mode MTU must be in 1..=255"
            )
        };
        Self {
            mode: FramingMode::Packet,
            mtu: MTU,
        }
    }

    pub fn mode(&self) -> FramingMode {
        self.mode
    }

    /// Maximum payload size in bytes.
    pub fn mtu(&self) -> usize {
        self.mtu
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::packet_fixed::<DEFAULT_MTU>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_packet_mode() {
        let cfg = FrameConfig::default();
        assert_eq!(cfg.mode(), FramingMode::Packet);
        assert_eq!(cfg.mtu(), DEFAULT_MTU);
    }

    #[test]
    fn packet_mtu_limited_to_length_byte() {
        assert!(FrameConfig::packet(MAX_PACKET_MTU).is_ok());
        let err = FrameConfig::packet(MAX_PACKET_MTU + 1).unwrap_err();
        assert!(matches!(err, FrameError::MtuTooLarge { mtu: 256, max: 255 }));
    }

    #[test]
    fn stream_mtu_not_limited_to_length_byte() {
        let cfg = FrameConfig::stream(4096).unwrap();
        assert_eq!(cfg.mode(), FramingMode::Stream);
        assert_eq!(cfg.mtu(), 4096);
    }

    #[test]
    fn zero_mtu_rejected_in_both_modes() {
        assert!(matches!(FrameConfig::packet(0), Err(FrameError::ZeroMtu)));
        assert!(matches!(FrameConfig::stream(0), Err(FrameError::ZeroMtu)));
    }

    #[test]
    fn fixed_config_matches_runtime_config() {
        const CFG: FrameConfig = FrameConfig::packet_fixed::<255>();
        assert_eq!(CFG, FrameConfig::packet(255).unwrap());
    }
}
