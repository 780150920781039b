use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{tag::Tag, LwoError};

const MAX_VERTEX_RESERVE: usize = 64 * 1024;

/// Wraps a reader and counts every byte pulled through it.
struct Counted<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

/// Sequential big-endian reader over an LWO byte stream.
///
/// All reads advance [`LwoReader::offset`]; the chunk decoders rely on it to
/// check that every chunk consumed exactly its declared length.
pub struct LwoReader<R> {
    src: Counted<R>,
}

impl<R: Read> LwoReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            src: Counted {
                inner: reader,
                pos: 0,
            },
        }
    }

    /// Bytes consumed since construction.
    pub fn offset(&self) -> u64 {
        self.src.pos
    }

    pub fn into_inner(self) -> R {
        self.src.inner
    }

    pub fn read_u8(&mut self) -> Result<u8, LwoError> {
        Ok(self.src.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16, LwoError> {
        Ok(self.src.read_u16::<BigEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16, LwoError> {
        Ok(self.src.read_i16::<BigEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32, LwoError> {
        Ok(self.src.read_u32::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32, LwoError> {
        Ok(self.src.read_i32::<BigEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32, LwoError> {
        Ok(self.src.read_f32::<BigEndian>()?)
    }

    pub fn read_tag(&mut self) -> Result<Tag, LwoError> {
        let mut bytes = [0u8; 4];
        self.src.read_exact(&mut bytes)?;
        Ok(Tag(bytes))
    }

    /// Read a NUL-terminated string padded to an even length.
    pub fn read_string(&mut self) -> Result<String, LwoError> {
        let mut bytes = Vec::new();
        loop {
            match self.src.read_u8()? {
                0 => break,
                b => bytes.push(b),
            }
        }
        // Terminator included, the stored length is always even.
        if bytes.len() % 2 == 0 {
            self.src.read_u8()?;
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a variable-length index, returning the value and the bytes used.
    ///
    /// Values below `0xFF00` are stored in two bytes; anything else is
    /// written as four bytes with `0xFF` in the high byte.
    pub fn read_vx(&mut self) -> Result<(u32, u64), LwoError> {
        let hi = self.src.read_u16::<BigEndian>()?;
        if hi >> 8 != 0xFF {
            return Ok((hi as u32, 2));
        }
        let lo = self.src.read_u16::<BigEndian>()?;
        Ok(((((hi & 0x00FF) as u32) << 16) | lo as u32, 4))
    }

    /// Append `count` big-endian `(x, y, z)` triples to `out`.
    ///
    /// `count` usually comes from a chunk header, so the up-front reservation
    /// is capped and the buffer grows only as data actually arrives.
    pub fn read_vertices(&mut self, count: usize, out: &mut Vec<f32>) -> Result<(), LwoError> {
        out.reserve(count.min(MAX_VERTEX_RESERVE).saturating_mul(3));
        for _ in 0..count.saturating_mul(3) {
            out.push(self.src.read_f32::<BigEndian>()?);
        }
        Ok(())
    }

    pub fn skip(&mut self, len: u64) -> Result<(), LwoError> {
        let copied = io::copy(&mut (&mut self.src).take(len), &mut io::sink())?;
        if copied < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("skip of {len} bytes hit end of stream after {copied}"),
            )
            .into());
        }
        Ok(())
    }
}
