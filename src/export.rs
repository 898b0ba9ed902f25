use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mesh_tools::compat::{Point3, Vector2, Vector3};
use mesh_tools::{GltfBuilder, Triangle};

use crate::error::ExportError;
use crate::spectrum::SpectrumParameters;
use crate::surface::Surface;

/// Size of the uncompressed TGA header
pub const TGA_HEADER_LEN: usize = 18;

const TGA_TRUE_COLOR: u8 = 2;
const TGA_GRAYSCALE: u8 = 3;

fn write_tga_header<W: Write>(
    writer: &mut W,
    image_type: u8,
    width: usize,
    height: usize,
    pixel_depth: u8,
) -> Result<(), ExportError> {
    let too_large = || ExportError::TooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let mut header = [0u8; TGA_HEADER_LEN];
    // id_length, color_map_type and color_map_spec stay zero
    header[2] = image_type;
    // x_origin, y_origin stay zero
    header[12..14].copy_from_slice(&w.to_le_bytes());
    header[14..16].copy_from_slice(&h.to_le_bytes());
    header[16] = pixel_depth;
    // image_descriptor = 0: rows run bottom to top
    writer.write_all(&header)?;
    Ok(())
}

/// Write the height map as an 8-bit grayscale TGA, heights remapped linearly
/// from `[min_height, max_height]` to `[0, 255]`
pub fn write_height_tga<W: Write>(surface: &Surface, writer: &mut W) -> Result<(), ExportError> {
    let (width, height) = surface.dims();
    write_tga_header(writer, TGA_GRAYSCALE, width, height, 8)?;

    let min = surface.min_height;
    let mut range = surface.max_height - min;
    if range == 0.0 {
        range = 1.0;
    }

    let pixels: Vec<u8> = surface
        .height
        .iter()
        .map(|&h| ((h - min) / range * 255.0) as u8)
        .collect();
    writer.write_all(&pixels)?;
    Ok(())
}

/// Write the normal map as a 24-bit TGA in BGR order
pub fn write_normal_tga<W: Write>(surface: &Surface, writer: &mut W) -> Result<(), ExportError> {
    let (width, height) = surface.dims();
    write_tga_header(writer, TGA_TRUE_COLOR, width, height, 24)?;

    let mut pixels = Vec::with_capacity(width * height * 3);
    for n in surface.normals.iter() {
        pixels.extend_from_slice(&[quantize(n.z), quantize(n.y), quantize(n.x)]);
    }
    writer.write_all(&pixels)?;
    Ok(())
}

/// `[0, 1]` to a byte, rounding to nearest
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn save_height_tga<P: AsRef<Path>>(surface: &Surface, path: P) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_height_tga(surface, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_normal_tga<P: AsRef<Path>>(surface: &Surface, path: P) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_normal_tga(surface, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Export the surface as a GLB mesh, one vertex per cell.
///
/// The patch spans `lx` by `ly` centred on the origin with Y up, so the
/// z-up surface normals are swizzled on the way out.
pub fn save_surface_glb<P: AsRef<Path>>(
    surface: &Surface,
    params: &SpectrumParameters,
    path: P,
) -> Result<(), ExportError> {
    let (nx, ny) = surface.dims();
    assert_eq!(
        (nx, ny),
        (params.nx, params.ny),
        "surface dimensions do not match parameters"
    );
    assert!(nx > 1 && ny > 1, "mesh export needs at least 2x2 cells, got {}x{}", nx, ny);

    let cell_x = params.lx / nx as f64;
    let cell_z = params.ly / ny as f64;

    let mut positions: Vec<Point3<f32>> = Vec::with_capacity(nx * ny);
    let mut normals: Vec<Vector3<f32>> = Vec::with_capacity(nx * ny);
    let mut uvs: Vec<Vector2<f32>> = Vec::with_capacity(nx * ny);

    for y in 0..ny {
        let z = (y as f64 * cell_z - params.ly / 2.0) as f32;
        for x in 0..nx {
            let px = (x as f64 * cell_x - params.lx / 2.0) as f32;
            positions.push(mesh_tools::compat::point3::new(px, surface.height[(x, y)], z));

            let n = surface.normal(x, y);
            normals.push(mesh_tools::compat::vector3::new(n.x, n.z, n.y));

            uvs.push(mesh_tools::compat::vector2::new(
                x as f32 / (nx - 1) as f32,
                y as f32 / (ny - 1) as f32,
            ));
        }
    }

    let mut triangles = Vec::with_capacity((nx - 1) * (ny - 1) * 2);
    for y in 0..ny - 1 {
        for x in 0..nx - 1 {
            let a = (x + y * nx) as u32;
            let b = (x + (y + 1) * nx) as u32;
            let c = (x + 1 + (y + 1) * nx) as u32;
            let d = (x + 1 + y * nx) as u32;

            triangles.push(Triangle::new(a, b, d));
            triangles.push(Triangle::new(b, c, d));
        }
    }

    let mut builder = GltfBuilder::new();
    let material = builder.create_basic_material(Some("OceanMaterial".to_string()), [0.0, 0.3, 0.8, 1.0]);
    let mesh_index = builder.create_simple_mesh(
        Some("OceanSurface".to_string()),
        &positions,
        &triangles,
        Some(normals),
        Some(uvs),
        Some(material),
    );
    let node = builder.add_node(None, Some(mesh_index), None, None, None);
    builder.add_scene(Some("Ocean Scene".to_string()), Some(vec![node]));

    let path = path.as_ref();
    let path_str = path
        .to_str()
        .ok_or_else(|| ExportError::Mesh(format!("non UTF-8 path: {}", path.display())))?;
    builder
        .export_glb(path_str)
        .map_err(|e| ExportError::Mesh(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use glam::Vec3;
    use tempfile::tempdir;

    fn tiny_surface() -> Surface {
        Surface {
            height: Grid::from_vec(2, 2, vec![1.0, 2.0, 3.0, 5.0]),
            normals: Grid::from_vec(
                2,
                2,
                vec![
                    Vec3::new(0.5, 0.5, 1.0),
                    Vec3::new(0.0, 0.25, 1.0),
                    Vec3::new(1.0, 0.0, 0.5),
                    Vec3::new(0.5, 0.5, 1.0),
                ],
            ),
            min_height: 1.0,
            max_height: 5.0,
        }
    }

    #[test]
    fn test_height_tga_bytes() {
        let mut buffer = Vec::new();
        write_height_tga(&tiny_surface(), &mut buffer).unwrap();

        assert_eq!(
            &buffer[..TGA_HEADER_LEN],
            &[0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 2, 0, 8, 0]
        );
        // (h - 1) / 4 * 255, truncated
        assert_eq!(&buffer[TGA_HEADER_LEN..], &[0, 63, 127, 255]);
    }

    #[test]
    fn test_height_tga_flat_surface() {
        let mut surface = tiny_surface();
        surface.height = Grid::filled(2, 2, 4.0);
        surface.min_height = 4.0;
        surface.max_height = 4.0;

        let mut buffer = Vec::new();
        write_height_tga(&surface, &mut buffer).unwrap();
        assert_eq!(&buffer[TGA_HEADER_LEN..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_normal_tga_bytes() {
        let mut buffer = Vec::new();
        write_normal_tga(&tiny_surface(), &mut buffer).unwrap();

        assert_eq!(buffer.len(), TGA_HEADER_LEN + 12);
        assert_eq!(buffer[2], 2);
        assert_eq!(buffer[16], 24);
        assert_eq!(
            &buffer[TGA_HEADER_LEN..],
            &[255, 128, 128, 255, 64, 0, 128, 0, 255, 255, 128, 128]
        );
    }

    #[test]
    fn test_rejects_oversized_image() {
        let mut buffer = Vec::new();
        let err = write_tga_header(&mut buffer, TGA_GRAYSCALE, 70_000, 2, 8).unwrap_err();
        assert!(matches!(err, ExportError::TooLarge { width: 70_000, height: 2 }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_save_files() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let surface = tiny_surface();

        let height_path = temp_dir.path().join("height.tga");
        save_height_tga(&surface, &height_path).expect("Failed to save height map");
        assert_eq!(std::fs::read(&height_path).unwrap().len(), TGA_HEADER_LEN + 4);

        let normal_path = temp_dir.path().join("normal.tga");
        save_normal_tga(&surface, &normal_path).expect("Failed to save normal map");
        assert_eq!(std::fs::read(&normal_path).unwrap().len(), TGA_HEADER_LEN + 12);
    }

    #[test]
    fn test_glb_export() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let path = temp_dir.path().join("ocean.glb");
        let params = SpectrumParameters {
            nx: 2,
            ny: 2,
            ..Default::default()
        };

        save_surface_glb(&tiny_surface(), &params, &path).expect("Failed to save GLB file");

        assert!(path.exists(), "GLB file was not created");
        let metadata = std::fs::metadata(&path).expect("Failed to get file metadata");
        assert!(metadata.len() > 0, "GLB file is empty");
    }

    #[test]
    #[should_panic(expected = "surface dimensions do not match parameters")]
    fn test_glb_export_rejects_mismatched_params() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let params = SpectrumParameters {
            nx: 4,
            ny: 2,
            ..Default::default()
        };
        let _ = save_surface_glb(&tiny_surface(), &params, temp_dir.path().join("ocean.glb"));
    }

    #[test]
    #[should_panic(expected = "mesh export needs at least 2x2 cells")]
    fn test_glb_export_rejects_single_column() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let surface = Surface {
            height: Grid::from_vec(1, 2, vec![1.0, 2.0]),
            normals: Grid::filled(1, 2, Vec3::new(0.5, 0.5, 1.0)),
            min_height: 1.0,
            max_height: 2.0,
        };
        let params = SpectrumParameters {
            nx: 1,
            ny: 2,
            ..Default::default()
        };
        let _ = save_surface_glb(&surface, &params, temp_dir.path().join("ocean.glb"));
    }
}
