use std::f32::consts::PI;
use std::path::Path;

use nalgebra_glm::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::error::AssetError;

// =============================================================================
// Vertex formats
// =============================================================================

/// Position, texture coordinate and normal, as consumed by the lit pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexPositionTextureNormal {
    pub position: [f32; 4],
    pub texture_coordinates: [f32; 2],
    pub normal: [f32; 3],
}

impl VertexPositionTextureNormal {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2, 2 => Float32x3];

    pub fn new(position: Vec3, texture_coordinates: Vec2, normal: Vec3) -> Self {
        VertexPositionTextureNormal {
            position: [position.x, position.y, position.z, 1.0],
            texture_coordinates: texture_coordinates.into(),
            normal: normal.into(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionTextureNormal>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexPositionTexture {
    pub position: [f32; 4],
    pub texture_coordinates: [f32; 2],
}

impl VertexPositionTexture {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2];

    pub fn new(position: [f32; 4], texture_coordinates: [f32; 2]) -> Self {
        VertexPositionTexture {
            position,
            texture_coordinates,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionTexture>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

// =============================================================================
// Procedural shapes
// =============================================================================

pub const MIN_SPHERE_SUBDIVISIONS: u32 = 3;
/// Keeps vertex counts well inside `u32` indices.
pub const MAX_SPHERE_SUBDIVISIONS: u32 = 1024;

/// Unit UV sphere. Triangles wind counter-clockwise seen from outside.
/// `subdivisions` is clamped to the supported range.
pub fn sphere(subdivisions: u32) -> Mesh<VertexPositionTextureNormal> {
    let subdivisions = subdivisions.clamp(MIN_SPHERE_SUBDIVISIONS, MAX_SPHERE_SUBDIVISIONS);
    let rows = subdivisions as usize;
    let mut vertices = Vec::with_capacity((rows + 1) * (rows + 1));
    let mut indices = Vec::with_capacity(rows * rows * 6);

    for latitude in 0..=subdivisions {
        let v = latitude as f32 / subdivisions as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();

        for longitude in 0..=subdivisions {
            let u = longitude as f32 / subdivisions as f32;
            let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();

            // Longitude runs east (counter-clockwise seen from +Y) so textures are not mirrored
            let point = Vec3::new(sin_theta * cos_phi, cos_theta, -sin_theta * sin_phi);
            vertices.push(VertexPositionTextureNormal::new(point, Vec2::new(u, v), point));
        }
    }

    for latitude in 0..subdivisions {
        for longitude in 0..subdivisions {
            let first = latitude * (subdivisions + 1) + longitude;
            let second = first + subdivisions + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Upright `size` x `size` quad standing on y = 1, facing +Z.
pub fn quad(size: f32) -> Mesh<VertexPositionTexture> {
    let half_size = size / 2.0;
    let vertices = vec![
        VertexPositionTexture::new([-half_size, 1.0, 0.0, 1.0], [0.0, 1.0]),
        VertexPositionTexture::new([-half_size, size + 1.0, 0.0, 1.0], [0.0, 0.0]),
        VertexPositionTexture::new([half_size, size + 1.0, 0.0, 1.0], [1.0, 0.0]),
        VertexPositionTexture::new([half_size, 1.0, 0.0, 1.0], [1.0, 1.0]),
    ];
    // Clockwise seen from +Z; the quad pipeline draws both faces
    let indices = vec![0, 1, 2, 0, 2, 3];
    Mesh { vertices, indices }
}

// =============================================================================
// OBJ models
// =============================================================================

/// Wavefront OBJ with positions and optional texture coordinates and normals.
/// Polygons are triangulated and every model in the file is merged into one mesh.
pub fn load_obj(path: &Path) -> Result<Mesh<VertexPositionTextureNormal>, AssetError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut mesh = Mesh {
        vertices: Vec::new(),
        indices: Vec::new(),
    };
    for model in &models {
        append_model(&mut mesh, &model.mesh);
    }

    if mesh.indices.is_empty() {
        return Err(AssetError::EmptyModel(path.to_path_buf()));
    }
    log::info!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

fn append_model(mesh: &mut Mesh<VertexPositionTextureNormal>, model: &tobj::Mesh) {
    let base = mesh.vertices.len() as u32;
    let has_normals = model.normals.len() == model.positions.len();
    let has_uvs = model.texcoords.len() * 3 == model.positions.len() * 2;

    for (i, position) in model.positions.chunks_exact(3).enumerate() {
        let uv = if has_uvs {
            // OBJ puts v = 0 at the bottom, textures are sampled top-down
            Vec2::new(model.texcoords[2 * i], 1.0 - model.texcoords[2 * i + 1])
        } else {
            Vec2::zeros()
        };
        let normal = if has_normals {
            Vec3::new(
                model.normals[3 * i],
                model.normals[3 * i + 1],
                model.normals[3 * i + 2],
            )
        } else {
            Vec3::y()
        };
        mesh.vertices.push(VertexPositionTextureNormal::new(
            Vec3::new(position[0], position[1], position[2]),
            uv,
            normal,
        ));
    }
    mesh.indices
        .extend(model.indices.iter().map(|index| base + index));
}

// =============================================================================
// GPU upload
// =============================================================================

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload<V: bytemuck::Pod>(device: &wgpu::Device, label: &str, mesh: &Mesh<V>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra_glm as glm;
    use std::io::Write;

    fn point(vertex: &VertexPositionTextureNormal) -> Vec3 {
        Vec3::new(vertex.position[0], vertex.position[1], vertex.position[2])
    }

    #[test]
    fn vertex_strides_match_layouts() {
        assert_eq!(VertexPositionTextureNormal::layout().array_stride, 36);
        assert_eq!(VertexPositionTexture::layout().array_stride, 24);
    }

    #[test]
    fn sphere_has_unit_radius_and_outward_normals() {
        let mesh = sphere(16);
        assert_eq!(mesh.vertices.len(), 17 * 17);
        assert_eq!(mesh.indices.len(), 16 * 16 * 6);
        for vertex in &mesh.vertices {
            let p = point(vertex);
            assert_relative_eq!(glm::length(&p), 1.0, epsilon = 1e-5);
            assert_relative_eq!(Vec3::from(vertex.normal), p, epsilon = 1e-6);
        }
    }

    #[test]
    fn sphere_winds_counter_clockwise_from_outside() {
        let mesh = sphere(12);
        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| point(&mesh.vertices[triangle[i] as usize]));
            let normal = glm::cross(&(b - a), &(c - a));
            if glm::length(&normal) < 1e-6 {
                // degenerate sliver at a pole
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(glm::dot(&normal, &centroid) > 0.0);
        }
    }

    #[test]
    fn sphere_texture_runs_east() {
        let mesh = sphere(4);
        // equator row, quarter turn east of +X is -Z
        let row = 2 * 5;
        assert_relative_eq!(point(&mesh.vertices[row]), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(
            point(&mesh.vertices[row + 1]),
            Vec3::new(0.0, 0.0, -1.0),
            epsilon = 1e-6
        );
        assert_eq!(mesh.vertices[row + 1].texture_coordinates, [0.25, 0.5]);
    }

    #[test]
    fn quad_matches_filtering_layout() {
        let mesh = quad(10.0);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[0].position, [-5.0, 1.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].position, [5.0, 11.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[1].texture_coordinates, [0.0, 0.0]);
    }

    #[test]
    fn sphere_subdivisions_are_clamped() {
        let mesh = sphere(0);
        assert_eq!(mesh.vertices.len(), 4 * 4);

        let mesh = sphere(MAX_SPHERE_SUBDIVISIONS + 1);
        let rows = MAX_SPHERE_SUBDIVISIONS as usize + 1;
        assert_eq!(mesh.vertices.len(), rows * rows);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    fn obj_file(source: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        write!(file, "{source}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn obj_quads_are_triangulated_and_flip_v() {
        let file = obj_file(
            "\
# unit square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
",
        );
        let mesh = load_obj(file.path()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].texture_coordinates, [0.0, 1.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn obj_without_uv_or_normal_gets_defaults() {
        let file = obj_file("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_obj(file.path()).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[0].texture_coordinates, [0.0, 0.0]);
    }

    #[test]
    fn obj_objects_are_merged() {
        let file = obj_file(
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = load_obj(file.path()).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert!(mesh.indices[3..].iter().all(|&i| i >= 3));
    }

    #[test]
    fn malformed_obj_is_an_asset_error() {
        let file = obj_file("v 0 zero 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }));
    }

    #[test]
    fn missing_obj_is_an_asset_error() {
        let err = load_obj(Path::new("does/not/exist.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }));
    }

    #[test]
    fn load_obj_rejects_empty_models() {
        let file = obj_file("v 0 0 0\n");
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyModel(_)));
    }
}
