use crate::error::Result;

/// Fixed line speed for real devices. Not negotiated at runtime.
pub const BAUD_RATE: u32 = 115_200;

/// A byte-oriented serial line, UART style.
///
/// Reads never block: `read_byte` returns `Ok(None)` when nothing is
/// pending. Writes are accepted in full or fail.
pub trait SerialLine {
    /// Number of bytes that can be read right now without blocking.
    fn available(&self) -> Result<usize>;

    /// Read a single byte if one is pending.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Write all of `bytes` to the line.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Push any buffered output onto the wire.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns true if at least one byte can be read without blocking.
    fn has_input(&self) -> Result<bool> {
        Ok(self.available()? > 0)
    }
}

impl<L: SerialLine + ?Sized> SerialLine for &mut L {
    fn available(&self) -> Result<usize> {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<L: SerialLine + ?Sized> SerialLine for Box<L> {
    fn available(&self) -> Result<usize> {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLine;

    fn drain_all<L: SerialLine>(mut line: L) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(byte) = line.read_byte().unwrap() {
            out.push(byte);
        }
        out
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut line = MemoryLine::new();
        line.inject(b"abc");

        assert!(line.has_input().unwrap());
        assert_eq!(drain_all(&mut line), b"abc");
        assert!(!line.has_input().unwrap());
    }

    #[test]
    fn boxed_line_forwards() {
        let line = MemoryLine::new();
        line.inject(&[1, 2]);
        let mut boxed: Box<dyn SerialLine> = Box::new(line.clone());

        assert_eq!(boxed.available().unwrap(), 2);
        boxed.write_bytes(b"out").unwrap();
        boxed.flush().unwrap();

        assert_eq!(drain_all(boxed), vec![1, 2]);
        assert_eq!(line.take_written(), b"out");
    }
}
