//! A decoder for LightWave Object files.
//!
//! Both the legacy `LWOB` grammar and its `LWO2` successor are read from the
//! same IFF-style container: a `FORM` envelope holding a list of
//! `tag · length · payload` chunks. Decoding produces an [`LwoObject`] with
//! the vertex table, the polygons, and the surface and tag name tables.
//!
//! LWOB polygons carry their surface inline and are folded into
//! [`PolygonGroup`]s of facets that can be drawn together. LWO2 polygons are
//! kept as individual [`PolygonRecord`]s whose surface is bound afterwards by
//! `PTAG` chunks.
//!
//! # Example
//!
//! ```rust
//! let mut data = Vec::new();
//! data.extend_from_slice(b"FORM");
//! data.extend_from_slice(&38u32.to_be_bytes());
//! data.extend_from_slice(b"LWOB");
//! data.extend_from_slice(b"PNTS");
//! data.extend_from_slice(&12u32.to_be_bytes());
//! for c in [1.0f32, 2.0, 3.0] {
//!     data.extend_from_slice(&c.to_be_bytes());
//! }
//! data.extend_from_slice(b"SRFS");
//! data.extend_from_slice(&6u32.to_be_bytes());
//! data.extend_from_slice(b"Skin\0\0");
//!
//! let object = lwo_reader::from_slice(&data).unwrap();
//! assert_eq!(object.format, lwo_reader::LwoFormat::Lwob);
//! assert_eq!(object.vertex(0), Some([1.0, 2.0, 3.0]));
//! assert_eq!(object.surface_names, vec!["Skin".to_string()]);
//! ```
//!
//! Unknown chunks are skipped, so files written by newer tools still load.

mod error;
mod mesh;
mod options;
mod parser;
mod polygons;
mod surface;

pub mod reader;
pub mod tag;

pub use error::LwoError;
pub use mesh::{
    LwoFormat, LwoObject, PolygonGroup, PolygonKind, PolygonRecord, SurfaceMaterial,
};
pub use options::DecodeOptions;
pub use parser::LwoParser;
pub use tag::Tag;

use std::io::{Cursor, Read};

/// Decode an LWO file from a reader with default options
pub fn from_reader<R: Read>(reader: R) -> Result<LwoObject, LwoError> {
    LwoParser::new(reader).parse()
}

/// Decode an LWO file from a reader
pub fn from_reader_with_options<R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<LwoObject, LwoError> {
    LwoParser::with_options(reader, options.clone()).parse()
}

/// Convenience function for decoding an in-memory file
pub fn from_slice(data: &[u8]) -> Result<LwoObject, LwoError> {
    from_reader(Cursor::new(data))
}
