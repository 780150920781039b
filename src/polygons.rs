//! Polygon assembly for both grammars.
//!
//! LWOB facets carry their surface inline and are folded into
//! [`PolygonGroup`]s. LWO2 polygons are kept one record each, with the
//! surface bound later by `PTAG`.

use std::{io::Read, sync::Arc};

use log::{trace, warn};

use crate::{
    mesh::{PolygonGroup, PolygonKind, PolygonRecord},
    reader::LwoReader,
    LwoError,
};

/// One facet as stored in an LWOB `POLS` chunk.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawFacet {
    pub indices: Vec<u32>,
    pub surface: i16,
}

impl RawFacet {
    fn vertex_count(&self) -> i32 {
        self.indices.len() as i32
    }
}

/// Surface of a detail polygon container, recovered from its negative reference.
pub(crate) fn detail_surface(surface: i16) -> i32 {
    match !(surface as i32) & 0xFFFF {
        0 => 1,
        s => s,
    }
}

/// First group with the surface and a compatible vertex count.
///
/// Counts are compatible when equal, or when both are above 3.
pub(crate) fn find_group(groups: &[PolygonGroup], surface: i32, vertex_count: i32) -> Option<usize> {
    groups.iter().position(|g| {
        let hint = g.vertex_count_hint as i32;
        g.surface_ref == surface && (hint == vertex_count || (hint > 3 && vertex_count > 3))
    })
}

/// Running state of the LWOB fold over one `POLS` chunk.
///
/// `groups` is shared across chunks so later chunks can reuse earlier groups.
pub(crate) struct GroupAccumulator<'a> {
    groups: &'a mut Vec<PolygonGroup>,
    vertices: Arc<[f32]>,
    current: Option<usize>,
    prev_surface: i32,
    prev_count: i32,
}

impl<'a> GroupAccumulator<'a> {
    pub fn new(groups: &'a mut Vec<PolygonGroup>, vertices: Arc<[f32]>) -> Self {
        Self {
            groups,
            vertices,
            current: None,
            prev_surface: 0,
            prev_count: -1,
        }
    }

    fn starts_new_group(&self, surface: i32, count: i32) -> bool {
        surface != self.prev_surface
            || (count != self.prev_count && (self.prev_count < 3 || count < 3))
    }

    fn new_group(&mut self, surface: i32, count: i32) -> usize {
        self.groups.push(PolygonGroup::new(
            surface,
            count as u16,
            self.vertices.clone(),
        ));
        self.groups.len() - 1
    }

    pub fn push(&mut self, facet: &RawFacet) {
        let surface = facet.surface as i32;
        let count = facet.vertex_count();

        let current = self.current;
        let index = match current {
            // The first facet of a chunk always opens a fresh group.
            None => self.new_group(surface, count),
            Some(_) if self.starts_new_group(surface, count) => {
                match find_group(&self.groups[..], surface, count) {
                    Some(found) => found,
                    None => self.new_group(surface, count),
                }
            }
            Some(current) => {
                let group = &mut self.groups[current];
                group.surface_ref = surface;
                group.vertex_count_hint = count as u16;
                current
            }
        };

        let group = &mut self.groups[index];
        group.push_facet(&facet.indices);
        if facet.surface < 0 {
            group.surface_ref = detail_surface(facet.surface);
        }

        self.current = Some(index);
        self.prev_surface = surface;
        self.prev_count = count;
    }
}

/// Skip the nested facets of a detail polygon container.
fn skip_detail_polygons<R: Read>(reader: &mut LwoReader<R>, count: u16) -> Result<(), LwoError> {
    trace!("skipping {count} detail polygons");
    for _ in 0..count {
        let vertex_count = reader.read_u16()? as u64;
        // Indices plus the trailing surface field.
        reader.skip(vertex_count * 2 + 2)?;
    }
    Ok(())
}

/// Read one LWOB facet, consuming any detail polygons that follow it.
pub(crate) fn read_lwob_facet<R: Read>(reader: &mut LwoReader<R>) -> Result<RawFacet, LwoError> {
    let count = reader.read_u16()?;
    let mut indices = Vec::with_capacity(count as usize);
    for _ in 0..count {
        indices.push(reader.read_u16()? as u32);
    }
    let surface = reader.read_i16()?;
    if surface < 0 {
        let nested = reader.read_u16()?;
        skip_detail_polygons(reader, nested)?;
    }
    Ok(RawFacet { indices, surface })
}

/// Decode an LWOB `POLS` payload of `length` bytes into `groups`.
pub(crate) fn decode_lwob_pols<R: Read>(
    reader: &mut LwoReader<R>,
    length: u32,
    groups: &mut Vec<PolygonGroup>,
    vertices: Arc<[f32]>,
) -> Result<(), LwoError> {
    let end = reader.offset() + length as u64;
    let mut acc = GroupAccumulator::new(groups, vertices);
    while reader.offset() < end {
        let facet = read_lwob_facet(reader)?;
        acc.push(&facet);
    }
    Ok(())
}

/// Read one LWO2 polygon, returning it with the number of bytes it used.
pub(crate) fn read_lwo2_polygon<R: Read>(
    reader: &mut LwoReader<R>,
    kind: PolygonKind,
    vertices: &Arc<[f32]>,
) -> Result<(PolygonRecord, u64), LwoError> {
    // The top six bits are flags.
    let count = reader.read_u16()? & 0x03FF;
    let mut consumed = 2;
    let mut indices = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (index, width) = reader.read_vx()?;
        indices.push(index);
        consumed += width;
    }
    let record = PolygonRecord {
        kind,
        indices,
        surface_name: None,
        vertices: vertices.clone(),
    };
    Ok((record, consumed))
}

/// Decode an LWO2 `POLS` payload, appending to the file-wide polygon list.
pub(crate) fn decode_lwo2_pols<R: Read>(
    reader: &mut LwoReader<R>,
    length: u32,
    polygons: &mut Vec<PolygonRecord>,
    vertices: &Arc<[f32]>,
) -> Result<(), LwoError> {
    let type_tag = reader.read_tag()?;
    let kind = PolygonKind::from_tag(type_tag);
    if let PolygonKind::Unknown(tag) = kind {
        warn!("Unknown POLS type {tag}");
    }

    let mut length_read = 4u64;
    while length_read < length as u64 {
        let (record, consumed) = read_lwo2_polygon(reader, kind, vertices)?;
        length_read += consumed;
        polygons.push(record);
    }
    Ok(())
}
