use serde::{Deserialize, Serialize};

/// Knobs controlling how tolerant the decoder is.
///
/// The defaults reproduce the byte-exact behaviour of the classic loaders:
/// no IFF pad bytes are assumed, and a `PNTS` chunk whose length is not a
/// multiple of 12 only produces a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Fail on a `PNTS` chunk with trailing bytes instead of warning.
    pub strict: bool,
    /// Consume one pad byte after every odd-length chunk.
    pub pad_odd_chunks: bool,
    /// Reject any chunk declaring more bytes than this.
    pub max_chunk_length: Option<u32>,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_odd_chunk_padding(mut self, pad: bool) -> Self {
        self.pad_odd_chunks = pad;
        self
    }

    pub fn with_max_chunk_length(mut self, max: u32) -> Self {
        self.max_chunk_length = Some(max);
        self
    }
}
