use std::io;

use thiserror::Error;

use crate::tag::Tag;

/// Errors that can occur while decoding an LWO file
#[derive(Error, Debug)]
pub enum LwoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Error while decoding {chunk} chunk: {source}")]
    Parsing {
        chunk: Tag,
        #[source]
        source: io::Error,
    },

    #[error("Invalid LWO file: missing FORM header")]
    MissingForm,

    #[error("Invalid LWO file: unrecognized FORM sub-type {0}")]
    UnrecognizedForm(Tag),

    #[error("Chunk length mismatch in {chunk}: declared {declared} bytes, consumed {consumed}")]
    ChunkLengthMismatch {
        chunk: Tag,
        declared: u64,
        consumed: u64,
    },

    #[error("Chunk {chunk} declares {declared} bytes, above the limit of {max}")]
    ChunkTooLarge { chunk: Tag, declared: u32, max: u32 },

    #[error("Polygon index {index} out of range ({len} polygons decoded)")]
    PolygonIndexOutOfRange { index: u32, len: usize },

    #[error("Tag index {index} out of range ({len} tags decoded)")]
    TagIndexOutOfRange { index: u16, len: usize },

    #[error("Unterminated string in {0} chunk")]
    InvalidString(Tag),

    #[error("PNTS chunk length {length} is not a multiple of 12")]
    TruncatedVertexChunk { length: u32 },
}

impl LwoError {
    /// Attach the chunk being decoded to a bare I/O failure.
    pub(crate) fn in_chunk(self, chunk: Tag) -> Self {
        match self {
            LwoError::Io(source) => LwoError::Parsing { chunk, source },
            other => other,
        }
    }

    /// True for the malformed-input kinds, as opposed to I/O failures.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, LwoError::Io(_) | LwoError::Parsing { .. })
    }
}
