use std::io::Read;

use log::trace;

use crate::{mesh::SurfaceMaterial, reader::LwoReader, tag::Tag, LwoError};

const FLAG_DOUBLE_SIDED: u16 = 0x0100;
const SIDE_BOTH: u16 = 3;

/// Walk the `tag · u16 length · data` sub-chunks up to `end`.
///
/// Each sub-chunk is bounded by its own length: whatever the handler leaves
/// unread is skipped.
fn for_each_subchunk<R, F>(reader: &mut LwoReader<R>, end: u64, mut handle: F) -> Result<(), LwoError>
where
    R: Read,
    F: FnMut(&mut LwoReader<R>, Tag, u16) -> Result<(), LwoError>,
{
    while reader.offset() + 6 <= end {
        let tag = reader.read_tag()?;
        let len = reader.read_u16()?;
        let sub_end = reader.offset() + len as u64;
        handle(reader, tag, len)?;

        let offset = reader.offset();
        if offset > sub_end {
            return Err(LwoError::ChunkLengthMismatch {
                chunk: tag,
                declared: len as u64,
                consumed: offset + len as u64 - sub_end,
            });
        }
        reader.skip(sub_end - offset)?;
    }
    if reader.offset() < end {
        reader.skip(end - reader.offset())?;
    }
    Ok(())
}

fn fixed_point<R: Read>(reader: &mut LwoReader<R>) -> Result<f32, LwoError> {
    Ok(reader.read_u16()? as f32 / 256.0)
}

/// Decode a legacy `SURF` chunk of `length` bytes.
pub(crate) fn decode_lwob_surface<R: Read>(
    reader: &mut LwoReader<R>,
    length: u32,
) -> Result<SurfaceMaterial, LwoError> {
    let end = reader.offset() + length as u64;
    let mut surf = SurfaceMaterial {
        name: reader.read_string()?,
        ..SurfaceMaterial::default()
    };
    trace!("LWOB surface {}", surf.name);
    // Float variants, merged over the fixed point values once all are read.
    let mut exact = SurfaceMaterial::default();

    for_each_subchunk(reader, end, |reader, tag, len| {
        match tag.as_bytes() {
            b"COLR" if len >= 3 => {
                let rgb = [reader.read_u8()?, reader.read_u8()?, reader.read_u8()?];
                surf.color = Some(rgb.map(|c| c as f32 / 255.0));
            }
            b"FLAG" if len >= 2 => {
                surf.double_sided = reader.read_u16()? & FLAG_DOUBLE_SIDED != 0;
            }
            b"LUMI" if len >= 2 => surf.luminosity = Some(fixed_point(reader)?),
            b"DIFF" if len >= 2 => surf.diffuse = Some(fixed_point(reader)?),
            b"SPEC" if len >= 2 => surf.specular = Some(fixed_point(reader)?),
            b"REFL" if len >= 2 => surf.reflection = Some(fixed_point(reader)?),
            b"TRAN" if len >= 2 => surf.transparency = Some(fixed_point(reader)?),
            b"VLUM" if len >= 4 => exact.luminosity = Some(reader.read_f32()?),
            b"VDIF" if len >= 4 => exact.diffuse = Some(reader.read_f32()?),
            b"VSPC" if len >= 4 => exact.specular = Some(reader.read_f32()?),
            b"VRFL" if len >= 4 => exact.reflection = Some(reader.read_f32()?),
            b"VTRN" if len >= 4 => exact.transparency = Some(reader.read_f32()?),
            b"GLOS" if len >= 2 => surf.glossiness = Some(reader.read_u16()? as f32),
            b"SMAN" if len >= 4 => surf.smoothing_angle = Some(reader.read_f32()?),
            _ => trace!("skipping surface attribute {tag}"),
        }
        Ok(())
    })?;

    surf.luminosity = exact.luminosity.or(surf.luminosity);
    surf.diffuse = exact.diffuse.or(surf.diffuse);
    surf.specular = exact.specular.or(surf.specular);
    surf.reflection = exact.reflection.or(surf.reflection);
    surf.transparency = exact.transparency.or(surf.transparency);
    Ok(surf)
}

/// Decode an LWO2 `SURF` chunk of `length` bytes.
///
/// Envelope references that follow most attributes are skipped.
pub(crate) fn decode_lwo2_surface<R: Read>(
    reader: &mut LwoReader<R>,
    length: u32,
) -> Result<SurfaceMaterial, LwoError> {
    let end = reader.offset() + length as u64;
    let name = reader.read_string()?;
    let source = reader.read_string()?;
    let mut surf = SurfaceMaterial {
        name,
        source: (!source.is_empty()).then_some(source),
        ..SurfaceMaterial::default()
    };
    trace!("LWO2 surface {}", surf.name);

    for_each_subchunk(reader, end, |reader, tag, len| {
        match tag.as_bytes() {
            b"COLR" if len >= 12 => {
                surf.color = Some([reader.read_f32()?, reader.read_f32()?, reader.read_f32()?]);
            }
            b"LUMI" if len >= 4 => surf.luminosity = Some(reader.read_f32()?),
            b"DIFF" if len >= 4 => surf.diffuse = Some(reader.read_f32()?),
            b"SPEC" if len >= 4 => surf.specular = Some(reader.read_f32()?),
            b"REFL" if len >= 4 => surf.reflection = Some(reader.read_f32()?),
            b"TRAN" if len >= 4 => surf.transparency = Some(reader.read_f32()?),
            b"GLOS" if len >= 4 => surf.glossiness = Some(reader.read_f32()?),
            b"SMAN" if len >= 4 => surf.smoothing_angle = Some(reader.read_f32()?),
            b"SIDE" if len >= 2 => surf.double_sided = reader.read_u16()? == SIDE_BOTH,
            _ => trace!("skipping surface attribute {tag}"),
        }
        Ok(())
    })?;
    Ok(surf)
}
