use std::fmt;

use serde::{Serialize, Serializer};

/// A four byte chunk identifier, e.g. `PNTS`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const FORM: Tag = Tag(*b"FORM");
    pub const LWOB: Tag = Tag(*b"LWOB");
    pub const LWO2: Tag = Tag(*b"LWO2");
    pub const SURF: Tag = Tag(*b"SURF");
    pub const PTCH: Tag = Tag(*b"PTCH");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<&[u8; 4]> for Tag {
    fn from(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Chunk identifiers known to either grammar.
///
/// Which of these a grammar acts on is decided by the grammar itself; a
/// known id that a grammar does not handle is skipped like `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkId {
    Pnts,
    Pols,
    Srfs,
    Surf,
    Crvs,
    Pchs,
    Tags,
    Ptag,
    Unknown(Tag),
}

const CHUNK_IDS: [(&[u8; 4], ChunkId); 8] = [
    (b"PNTS", ChunkId::Pnts),
    (b"POLS", ChunkId::Pols),
    (b"SRFS", ChunkId::Srfs),
    (b"SURF", ChunkId::Surf),
    (b"CRVS", ChunkId::Crvs),
    (b"PCHS", ChunkId::Pchs),
    (b"TAGS", ChunkId::Tags),
    (b"PTAG", ChunkId::Ptag),
];

impl ChunkId {
    pub fn from_tag(tag: Tag) -> Self {
        CHUNK_IDS
            .iter()
            .find(|(bytes, _)| **bytes == tag.0)
            .map(|(_, id)| *id)
            .unwrap_or(ChunkId::Unknown(tag))
    }
}
