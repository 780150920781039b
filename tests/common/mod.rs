#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};

/// Assembles LWO byte streams chunk by chunk.
pub struct LwoBuilder {
    form: [u8; 4],
    chunks: Vec<u8>,
}

impl LwoBuilder {
    pub fn lwob() -> Self {
        Self {
            form: *b"LWOB",
            chunks: Vec::new(),
        }
    }

    pub fn lwo2() -> Self {
        Self {
            form: *b"LWO2",
            chunks: Vec::new(),
        }
    }

    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks
            .write_u32::<BigEndian>(payload.len() as u32)
            .unwrap();
        self.chunks.extend_from_slice(payload);
        self
    }

    /// A chunk whose header lies about its length.
    pub fn chunk_with_length(mut self, tag: &[u8; 4], length: u32, payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks.write_u32::<BigEndian>(length).unwrap();
        self.chunks.extend_from_slice(payload);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.chunks.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = b"FORM".to_vec();
        out.write_u32::<BigEndian>(self.chunks.len() as u32 + 4)
            .unwrap();
        out.extend_from_slice(&self.form);
        out.extend_from_slice(&self.chunks);
        out
    }
}

pub fn points(coords: &[[f32; 3]]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in coords {
        for &c in v {
            out.write_f32::<BigEndian>(c).unwrap();
        }
    }
    out
}

/// NUL-terminated names, each padded to an even length.
pub fn names(list: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for name in list {
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        if out.len() % 2 == 1 {
            out.push(0);
        }
    }
    out
}

/// An LWOB facet: vertex count, indices, surface.
pub fn lwob_facet(out: &mut Vec<u8>, indices: &[u16], surface: i16) {
    out.write_u16::<BigEndian>(indices.len() as u16).unwrap();
    for &i in indices {
        out.write_u16::<BigEndian>(i).unwrap();
    }
    out.write_i16::<BigEndian>(surface).unwrap();
}

pub fn vx(out: &mut Vec<u8>, value: u32) {
    if value < 0xFF00 {
        out.write_u16::<BigEndian>(value as u16).unwrap();
    } else {
        out.write_u32::<BigEndian>(value | 0xFF00_0000).unwrap();
    }
}

/// An LWO2 `POLS` payload of the given type.
pub fn lwo2_pols(kind: &[u8; 4], polygons: &[&[u32]]) -> Vec<u8> {
    let mut out = kind.to_vec();
    for poly in polygons {
        out.write_u16::<BigEndian>(poly.len() as u16).unwrap();
        for &i in poly.iter() {
            vx(&mut out, i);
        }
    }
    out
}

/// An LWO2 `PTAG` payload binding polygons to tag indices.
pub fn ptag(kind: &[u8; 4], bindings: &[(u32, u16)]) -> Vec<u8> {
    let mut out = kind.to_vec();
    for &(poly, tag) in bindings {
        vx(&mut out, poly);
        out.write_u16::<BigEndian>(tag).unwrap();
    }
    out
}

pub fn triangle_points() -> Vec<u8> {
    points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]])
}
