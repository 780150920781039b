//! Async loading example: read an LWO file with tokio, then decode it.
//!
//! Usage: `cargo run --example async_load -- model.lwo`

use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        return Err("usage: async_load <file.lwo>".into());
    };

    println!("=== Async LWO Loading ===");

    let mut file = tokio::fs::File::open(&path).await?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).await?;
    println!("Read {} bytes from {path}", data.len());

    // Decoding is synchronous, keep it off the async workers.
    let object = tokio::task::spawn_blocking(move || lwo_reader::from_slice(&data)).await??;

    println!("Format: {}", object.format);
    println!("Vertices: {}", object.vertex_count());
    for group in &object.groups {
        let name = object.surface_name_for(group).unwrap_or("<unnamed>");
        println!("  group {name}: {} facets", group.facet_count());
    }
    if !object.polygons.is_empty() {
        let bound = object
            .polygons
            .iter()
            .filter(|p| p.surface_name.is_some())
            .count();
        println!("Polygons: {} ({bound} with a surface)", object.polygons.len());
    }
    for surface in &object.surfaces {
        println!("  surface {}: color {:?}", surface.name, surface.color);
    }

    Ok(())
}
