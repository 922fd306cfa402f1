use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serialport::{SerialPort, TTYPort};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::line::{SerialLine, BAUD_RATE};

/// A serial device node (`/dev/ttyUSB0`, `/dev/cu.usbmodem…`) opened 8N1 at
/// [`BAUD_RATE`] with a zero timeout, so reads never wait.
pub struct TtyLine {
    port: TTYPort,
    path: PathBuf,
}

impl TtyLine {
    /// Open and configure the device at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let port = serialport::new(path.to_string_lossy(), BAUD_RATE)
            .timeout(Duration::ZERO)
            .open_native()
            .map_err(|err| open_error(&path, err))?;

        info!(?path, baud = BAUD_RATE, "opened serial line");
        Ok(Self { port, path })
    }

    /// Device path this line was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Missing or forbidden device nodes are open failures; anything the port
/// layer rejects after that (not a tty, locked, bad settings) is a
/// configuration failure.
fn open_error(path: &Path, err: serialport::Error) -> TransportError {
    let source = io::Error::from(err);
    match source.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => TransportError::Open {
            path: path.to_path_buf(),
            source,
        },
        _ => TransportError::Configure {
            path: path.to_path_buf(),
            source,
        },
    }
}

impl SerialLine for TtyLine {
    fn available(&self) -> Result<usize> {
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|err| TransportError::Io(err.into()))?;
        Ok(pending as usize)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(1) => return Ok(Some(byte[0])),
                Ok(_) => {
                    debug!(path = ?self.path, "serial line hung up");
                    return Err(TransportError::Closed);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(None)
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.port.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
                    ) =>
                {
                    continue
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.port.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl std::fmt::Debug for TtyLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyLine").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_reports_path() {
        let path = std::env::temp_dir().join(format!(
            "serlink-no-such-tty-{}",
            std::process::id()
        ));
        let err = TtyLine::open(&path).unwrap_err();
        assert!(matches!(err, TransportError::Open { path: p, .. } if p == path));
    }

    #[test]
    fn open_regular_file_fails_configuration() {
        let path = std::env::temp_dir().join(format!(
            "serlink-not-a-tty-{}",
            std::process::id()
        ));
        std::fs::write(&path, b"").unwrap();

        let err = TtyLine::open(&path).unwrap_err();
        assert!(matches!(err, TransportError::Configure { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn port_errors_split_into_open_and_configure() {
        let path = Path::new("/dev/ttyUSB9");

        let missing = serialport::Error::new(serialport::ErrorKind::NoDevice, "no such device");
        assert!(matches!(open_error(path, missing), TransportError::Open { .. }));

        let denied = serialport::Error::new(
            serialport::ErrorKind::Io(ErrorKind::PermissionDenied),
            "permission denied",
        );
        assert!(matches!(open_error(path, denied), TransportError::Open { .. }));

        let not_a_tty = serialport::Error::new(serialport::ErrorKind::Unknown, "not a tty");
        assert!(matches!(
            open_error(path, not_a_tty),
            TransportError::Configure { path: p, .. } if p == path
        ));
    }
}
