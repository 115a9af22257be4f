//! Byte transports the decoder reads from.

use std::io::{Cursor, Read};

use crate::error::{EscError, EscResult};

/// An ordered byte source such as a serial port.
///
/// Implementations own the timeout policy: `read_exact` either fills the
/// buffer or fails, and the decoder never buffers a partial read.
pub trait FrameSource {
    /// Whether at least one byte can be read without waiting.
    fn bytes_available(&mut self) -> EscResult<bool>;

    /// Fill `buf` completely or fail with a timeout or transport error.
    fn read_exact(&mut self, buf: &mut [u8]) -> EscResult<()>;

    fn read_byte(&mut self) -> EscResult<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        let [b] = byte;
        Ok(b)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn bytes_available(&mut self) -> EscResult<bool> {
        (**self).bytes_available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> EscResult<()> {
        (**self).read_exact(buf)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn bytes_available(&mut self) -> EscResult<bool> {
        (**self).bytes_available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> EscResult<()> {
        (**self).read_exact(buf)
    }
}

/// In-memory replay of a captured byte stream.
///
/// Running out of bytes mid-read behaves like a serial timeout: the bytes that
/// did arrive are consumed and [`EscError::ShortRead`] is returned.
impl<T: AsRef<[u8]>> FrameSource for Cursor<T> {
    fn bytes_available(&mut self) -> EscResult<bool> {
        Ok(remaining(self) > 0)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> EscResult<()> {
        let available = remaining(self);
        if available < buf.len() {
            let len = self.get_ref().as_ref().len() as u64;
            self.set_position(len);
            return Err(EscError::ShortRead {
                expected: buf.len(),
                received: available,
            });
        }
        Read::read_exact(self, buf).map_err(EscError::from)
    }
}

fn remaining<T: AsRef<[u8]>>(cursor: &Cursor<T>) -> usize {
    let len = cursor.get_ref().as_ref().len();
    let pos = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
    len.saturating_sub(pos)
}
