use std::{io::Read, sync::Arc};

use log::{debug, trace, warn};

use crate::{
    mesh::{LwoFormat, LwoObject},
    polygons::{decode_lwo2_pols, decode_lwob_pols},
    reader::LwoReader,
    surface::{decode_lwo2_surface, decode_lwob_surface},
    tag::{ChunkId, Tag},
    DecodeOptions, LwoError,
};

/// Decodes one LWO stream into an [`LwoObject`].
///
/// The parser reads the `FORM` envelope, picks the grammar named by its
/// sub-type and then walks the chunk list. Every chunk handler must consume
/// exactly the chunk's declared length; anything else fails the parse with
/// [`LwoError::ChunkLengthMismatch`].
pub struct LwoParser<R> {
    reader: LwoReader<R>,
    options: DecodeOptions,
}

impl<R: Read> LwoParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            reader: LwoReader::new(reader),
            options,
        }
    }

    pub fn parse(mut self) -> Result<LwoObject, LwoError> {
        if self.reader.read_tag()? != Tag::FORM {
            return Err(LwoError::MissingForm);
        }
        // The sub-type tag is counted in the FORM length.
        let data_length = (self.reader.read_u32()? as u64).saturating_sub(4);

        let format = match self.reader.read_tag()? {
            Tag::LWOB => LwoFormat::Lwob,
            Tag::LWO2 => LwoFormat::Lwo2,
            other => return Err(LwoError::UnrecognizedForm(other)),
        };
        debug!("Decoding {format} object, {data_length} bytes of chunks");

        let mut object = LwoObject::new(format);
        let mut consumed = 0u64;
        while consumed < data_length {
            consumed += self.read_chunk(&mut object)?;
        }
        Ok(object)
    }

    /// Read one chunk header and payload, returning the bytes used.
    fn read_chunk(&mut self, object: &mut LwoObject) -> Result<u64, LwoError> {
        let start = self.reader.offset();
        let tag = self.reader.read_tag()?;
        let length = self.reader.read_u32()?;
        debug!("Chunk {tag} at offset {start}, {length} bytes");

        if let Some(max) = self.options.max_chunk_length {
            if length > max {
                return Err(LwoError::ChunkTooLarge {
                    chunk: tag,
                    declared: length,
                    max,
                });
            }
        }

        let payload_start = self.reader.offset();
        let decoded = match object.format {
            LwoFormat::Lwob => self.decode_lwob_chunk(object, tag, length),
            LwoFormat::Lwo2 => self.decode_lwo2_chunk(object, tag, length),
        };
        decoded.map_err(|e| e.in_chunk(tag))?;

        let used = self.reader.offset() - payload_start;
        if used != length as u64 {
            return Err(LwoError::ChunkLengthMismatch {
                chunk: tag,
                declared: length as u64,
                consumed: used,
            });
        }
        if self.options.pad_odd_chunks && length % 2 == 1 {
            self.reader.skip(1).map_err(|e| e.in_chunk(tag))?;
        }
        Ok(self.reader.offset() - start)
    }

    fn decode_lwob_chunk(
        &mut self,
        object: &mut LwoObject,
        tag: Tag,
        length: u32,
    ) -> Result<(), LwoError> {
        match ChunkId::from_tag(tag) {
            ChunkId::Pnts => self.read_points(object, length),
            ChunkId::Pols => decode_lwob_pols(
                &mut self.reader,
                length,
                &mut object.groups,
                object.vertices.clone(),
            ),
            ChunkId::Srfs => {
                object.surface_names = self.read_names(tag, length)?;
                Ok(())
            }
            ChunkId::Surf => {
                let surface = decode_lwob_surface(&mut self.reader, length)?;
                object.surfaces.push(surface);
                Ok(())
            }
            ChunkId::Crvs | ChunkId::Pchs => self.reader.skip(length as u64),
            _ => self.skip_unknown(tag, length),
        }
    }

    fn decode_lwo2_chunk(
        &mut self,
        object: &mut LwoObject,
        tag: Tag,
        length: u32,
    ) -> Result<(), LwoError> {
        match ChunkId::from_tag(tag) {
            ChunkId::Pnts => self.read_points(object, length),
            ChunkId::Pols => decode_lwo2_pols(
                &mut self.reader,
                length,
                &mut object.polygons,
                &object.vertices,
            ),
            ChunkId::Tags => {
                object.tags = self.read_names(tag, length)?;
                Ok(())
            }
            ChunkId::Ptag => self.bind_tags(object, length),
            ChunkId::Surf => {
                let surface = decode_lwo2_surface(&mut self.reader, length)?;
                object.surfaces.push(surface);
                Ok(())
            }
            _ => self.skip_unknown(tag, length),
        }
    }

    fn skip_unknown(&mut self, tag: Tag, length: u32) -> Result<(), LwoError> {
        debug!("Skipping unknown chunk {tag}");
        self.reader.skip(length as u64)
    }

    /// Replace the current vertex table with the contents of a `PNTS` chunk.
    fn read_points(&mut self, object: &mut LwoObject, length: u32) -> Result<(), LwoError> {
        let count = (length / 12) as usize;
        let remainder = length % 12;
        if remainder != 0 {
            if self.options.strict {
                return Err(LwoError::TruncatedVertexChunk { length });
            }
            warn!("PNTS length {length} is not a multiple of 12, ignoring {remainder} trailing bytes");
        }

        let mut coords = Vec::new();
        self.reader.read_vertices(count, &mut coords)?;
        self.reader.skip(remainder as u64)?;
        object.vertices = Arc::from(coords);
        Ok(())
    }

    /// Read strings until exactly `length` bytes are used.
    fn read_names(&mut self, tag: Tag, length: u32) -> Result<Vec<String>, LwoError> {
        let end = self.reader.offset() + length as u64;
        let mut names = Vec::new();
        while self.reader.offset() < end {
            let name = self.reader.read_string()?;
            if self.reader.offset() > end {
                return Err(LwoError::InvalidString(tag));
            }
            trace!("{tag} entry {}: {name}", names.len());
            names.push(name);
        }
        Ok(names)
    }

    /// Apply a `PTAG` chunk to the polygons decoded so far.
    ///
    /// Polygon indices are positions in the file-wide polygon list, so they
    /// stay valid across several `POLS` chunks.
    fn bind_tags(&mut self, object: &mut LwoObject, length: u32) -> Result<(), LwoError> {
        let kind = self.reader.read_tag()?;
        let binds_surface = kind == Tag::SURF;
        if !binds_surface {
            warn!("Ignoring PTAG of type {kind}");
        }

        let mut length_read = 4u64;
        while length_read < length as u64 {
            let (polygon, width) = self.reader.read_vx()?;
            let tag_index = self.reader.read_u16()?;
            length_read += width + 2;

            let tag_count = object.tags.len();
            let tag = object
                .tags
                .get(tag_index as usize)
                .ok_or_else(|| LwoError::TagIndexOutOfRange {
                    index: tag_index,
                    len: tag_count,
                })?;
            let polygon_count = object.polygons.len();
            let record = object.polygons.get_mut(polygon as usize).ok_or_else(|| {
                LwoError::PolygonIndexOutOfRange {
                    index: polygon,
                    len: polygon_count,
                }
            })?;
            if binds_surface {
                record.surface_name = Some(tag.clone());
            }
        }
        Ok(())
    }
}
