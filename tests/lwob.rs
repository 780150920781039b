//! Decoding of legacy LWOB streams

mod common;

use common::{lwob_facet, names, points, triangle_points, LwoBuilder};
use lwo_reader::{from_slice, LwoError, LwoFormat};

#[test]
fn test_single_triangle() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], 0);
    assert_eq!(pols.len(), 10);

    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk(b"POLS", &pols)
        .build();

    let object = from_slice(&data).unwrap();
    assert_eq!(object.format, LwoFormat::Lwob);
    assert_eq!(object.vertex_count(), 3);
    assert_eq!(object.vertex(2), Some([0.5, 1.0, 0.0]));
    assert_eq!(object.groups.len(), 1);

    let group = &object.groups[0];
    assert_eq!(group.facet_sizes, vec![3]);
    assert_eq!(group.facet_indices, vec![0, 1, 2]);
    assert_eq!(group.surface_ref, 0);
    assert_eq!(&group.vertices[..], &object.vertices[..]);
}

#[test]
fn test_surfaces_group_facets() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], 1);
    lwob_facet(&mut pols, &[0, 2, 3, 1], 1);
    lwob_facet(&mut pols, &[1, 2, 3], 2);
    lwob_facet(&mut pols, &[0, 1], 2);
    lwob_facet(&mut pols, &[3, 2, 1], 1);

    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &points(&[[0.0; 3], [1.0; 3], [2.0; 3], [3.0; 3]]))
        .chunk(b"SRFS", &names(&["Body", "Trim"]))
        .chunk(b"POLS", &pols)
        .build();

    let object = from_slice(&data).unwrap();
    assert_eq!(object.surface_names, vec!["Body", "Trim"]);

    let summary: Vec<(i32, Vec<u16>)> = object
        .groups
        .iter()
        .map(|g| (g.surface_ref, g.facet_sizes.clone()))
        .collect();
    // The first group's hint moved to 4 with the quad, so the closing
    // triangle no longer matches it and opens a group of its own.
    assert_eq!(
        summary,
        vec![(1, vec![3, 4]), (2, vec![3]), (2, vec![2]), (1, vec![3])]
    );
    assert_eq!(object.surface_name_for(&object.groups[0]), Some("Body"));
    assert_eq!(object.surface_name_for(&object.groups[2]), Some("Trim"));

    let facets: Vec<&[u32]> = object.groups[0].facets().collect();
    assert_eq!(facets, vec![&[0u32, 1, 2][..], &[0, 2, 3, 1][..]]);
}

#[test]
fn test_detail_polygons_do_not_disturb_geometry() {
    let mut plain = Vec::new();
    lwob_facet(&mut plain, &[0, 1, 2], 2);

    let mut detailed = Vec::new();
    lwob_facet(&mut detailed, &[0, 1, 2], -3);
    detailed.extend_from_slice(&2u16.to_be_bytes());
    lwob_facet(&mut detailed, &[2, 1, 0], 1);
    lwob_facet(&mut detailed, &[0, 1, 2, 0], 1);

    let decode = |pols: &[u8]| {
        let data = LwoBuilder::lwob()
            .chunk(b"PNTS", &triangle_points())
            .chunk(b"POLS", pols)
            .chunk(b"SRFS", &names(&["A", "B"]))
            .build();
        from_slice(&data).unwrap()
    };

    let plain = decode(&plain);
    let detailed = decode(&detailed);
    assert_eq!(detailed.groups.len(), 1);
    assert_eq!(detailed.groups[0].surface_ref, 2);
    assert_eq!(detailed.groups, plain.groups);
    // The chunk after the detail polygons is still found.
    assert_eq!(detailed.surface_names, vec!["A", "B"]);
}

#[test]
fn test_detail_surface_zero_becomes_one() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], -1);
    pols.extend_from_slice(&0u16.to_be_bytes());

    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk(b"POLS", &pols)
        .build();
    let object = from_slice(&data).unwrap();
    assert_eq!(object.groups[0].surface_ref, 1);
}

#[test]
fn test_second_pols_chunk_starts_fresh_group() {
    let mut first = Vec::new();
    lwob_facet(&mut first, &[0, 1, 2], 1);
    let mut second = Vec::new();
    lwob_facet(&mut second, &[2, 1, 0], 1);
    lwob_facet(&mut second, &[0, 1], 3);
    lwob_facet(&mut second, &[1, 2, 0], 1);

    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk(b"POLS", &first)
        .chunk(b"POLS", &second)
        .build();
    let object = from_slice(&data).unwrap();

    // The earliest matching group wins when a run resumes.
    assert_eq!(object.groups.len(), 3);
    assert_eq!(object.groups[0].facet_indices, vec![0, 1, 2, 1, 2, 0]);
    assert_eq!(object.groups[1].facet_indices, vec![2, 1, 0]);
    assert_eq!(object.groups[2].facet_indices, vec![0, 1]);
}

#[test]
fn test_pass_through_chunks_are_skipped() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], 1);

    let plain = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk(b"POLS", &pols)
        .build();
    let extended = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk(b"CRVS", &[0u8; 10])
        .chunk(b"POLS", &pols)
        .chunk(b"PCHS", &[1u8; 4])
        .chunk(b"XTRA", b"future data!")
        .build();

    let plain = from_slice(&plain).unwrap();
    let extended = from_slice(&extended).unwrap();
    assert_eq!(plain.groups, extended.groups);
    assert_eq!(plain.vertices, extended.vertices);
}

#[test]
fn test_surf_chunk_builds_material() {
    let mut surf = names(&["Body"]);
    surf.extend_from_slice(b"COLR");
    surf.extend_from_slice(&4u16.to_be_bytes());
    surf.extend_from_slice(&[0, 255, 0, 0]);
    surf.extend_from_slice(b"TRAN");
    surf.extend_from_slice(&2u16.to_be_bytes());
    surf.extend_from_slice(&64u16.to_be_bytes());

    let data = LwoBuilder::lwob()
        .chunk(b"SRFS", &names(&["Body"]))
        .chunk(b"SURF", &surf)
        .build();
    let object = from_slice(&data).unwrap();
    let material = object.surface("Body").unwrap();
    assert_eq!(material.color, Some([0.0, 1.0, 0.0]));
    assert_eq!(material.transparency, Some(0.25));
}

#[test]
fn test_overlong_polygon_is_a_length_mismatch() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], 0);

    // The header declares 8 bytes for a 10 byte facet.
    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk_with_length(b"POLS", 8, &pols)
        .build();
    match from_slice(&data) {
        Err(LwoError::ChunkLengthMismatch {
            chunk,
            declared,
            consumed,
        }) => {
            assert_eq!(chunk.to_string(), "POLS");
            assert_eq!(declared, 8);
            assert_eq!(consumed, 10);
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }
}

#[test]
fn test_truncated_pols_reports_chunk() {
    let mut pols = Vec::new();
    lwob_facet(&mut pols, &[0, 1, 2], 0);
    pols.truncate(6);

    let data = LwoBuilder::lwob()
        .chunk(b"PNTS", &triangle_points())
        .chunk_with_length(b"POLS", 10, &pols)
        .build();
    let err = from_slice(&data).unwrap_err();
    assert!(!err.is_format_error());
    match err {
        LwoError::Parsing { chunk, source } => {
            assert_eq!(chunk.to_string(), "POLS");
            assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected parsing error, got {other:?}"),
    }
}
