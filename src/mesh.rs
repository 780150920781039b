use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::tag::Tag;

/// Which of the two chunk grammars a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LwoFormat {
    Lwob,
    Lwo2,
}

impl fmt::Display for LwoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LwoFormat::Lwob => write!(f, "LWOB"),
            LwoFormat::Lwo2 => write!(f, "LWO2"),
        }
    }
}

/// A batch of LWOB facets sharing a surface and a compatible vertex count.
///
/// `facet_indices` is the concatenation of every facet's index run, in the
/// order the facets were declared; `facet_sizes` gives the run lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonGroup {
    pub surface_ref: i32,
    /// Vertex count of the facet most recently folded into this group.
    pub vertex_count_hint: u16,
    pub facet_sizes: Vec<u16>,
    pub facet_indices: Vec<u32>,
    /// The vertex table that was current when this group was created.
    pub vertices: Arc<[f32]>,
}

impl PolygonGroup {
    pub(crate) fn new(surface_ref: i32, vertex_count_hint: u16, vertices: Arc<[f32]>) -> Self {
        Self {
            surface_ref,
            vertex_count_hint,
            facet_sizes: Vec::new(),
            facet_indices: Vec::new(),
            vertices,
        }
    }

    pub(crate) fn push_facet(&mut self, indices: &[u32]) {
        self.facet_sizes.push(indices.len() as u16);
        self.facet_indices.extend_from_slice(indices);
    }

    pub fn facet_count(&self) -> usize {
        self.facet_sizes.len()
    }

    /// Iterate over each facet's vertex indices.
    pub fn facets(&self) -> impl Iterator<Item = &[u32]> + '_ {
        let mut start = 0;
        self.facet_sizes.iter().map(move |&size| {
            let run = &self.facet_indices[start..start + size as usize];
            start += size as usize;
            run
        })
    }
}

/// The sub-grammar an LWO2 `POLS` chunk declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolygonKind {
    Surface,
    Patch,
    Unknown(Tag),
}

impl PolygonKind {
    pub fn from_tag(tag: Tag) -> Self {
        match tag {
            Tag::SURF => PolygonKind::Surface,
            Tag::PTCH => PolygonKind::Patch,
            other => PolygonKind::Unknown(other),
        }
    }
}

/// A single LWO2 polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonRecord {
    pub kind: PolygonKind,
    pub indices: Vec<u32>,
    /// Set by a later `PTAG` chunk; `None` when no binding names it.
    pub surface_name: Option<String>,
    pub vertices: Arc<[f32]>,
}

impl PolygonRecord {
    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }
}

/// Rendering attributes decoded from a `SURF` chunk.
///
/// Only the commonly used attributes are kept; anything else in the chunk is
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceMaterial {
    pub name: String,
    /// LWO2 only: the surface this one inherits from.
    pub source: Option<String>,
    pub color: Option<[f32; 3]>,
    pub luminosity: Option<f32>,
    pub diffuse: Option<f32>,
    pub specular: Option<f32>,
    pub reflection: Option<f32>,
    pub transparency: Option<f32>,
    pub glossiness: Option<f32>,
    /// Maximum smoothing angle in radians.
    pub smoothing_angle: Option<f32>,
    pub double_sided: bool,
}

/// Everything decoded from one LWO file.
#[derive(Debug, Clone, Serialize)]
pub struct LwoObject {
    pub format: LwoFormat,
    /// The most recently decoded vertex table, flat `x, y, z` triples.
    pub vertices: Arc<[f32]>,
    /// LWOB facets, grouped by surface.
    pub groups: Vec<PolygonGroup>,
    /// LWO2 polygons in file order across all `POLS` chunks.
    pub polygons: Vec<PolygonRecord>,
    /// LWOB `SRFS` names.
    pub surface_names: Vec<String>,
    /// LWO2 `TAGS` names.
    pub tags: Vec<String>,
    pub surfaces: Vec<SurfaceMaterial>,
}

impl LwoObject {
    pub(crate) fn new(format: LwoFormat) -> Self {
        Self {
            format,
            vertices: Arc::from(Vec::new()),
            groups: Vec::new(),
            polygons: Vec::new(),
            surface_names: Vec::new(),
            tags: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Position of vertex `index` in the current vertex table.
    pub fn vertex(&self, index: usize) -> Option<[f32; 3]> {
        let start = index.checked_mul(3)?;
        let v = self.vertices.get(start..start.checked_add(3)?)?;
        Some([v[0], v[1], v[2]])
    }

    pub fn surface(&self, name: &str) -> Option<&SurfaceMaterial> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    /// Name of an LWOB group's surface; references are 1-based into `SRFS`.
    pub fn surface_name_for(&self, group: &PolygonGroup) -> Option<&str> {
        let index = usize::try_from(group.surface_ref).ok()?.checked_sub(1)?;
        self.surface_names.get(index).map(String::as_str)
    }

    /// Material bound to an LWO2 polygon through `PTAG`.
    pub fn surface_for(&self, polygon: &PolygonRecord) -> Option<&SurfaceMaterial> {
        self.surface(polygon.surface_name.as_deref()?)
    }
}
