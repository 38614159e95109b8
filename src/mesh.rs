//! Box mesh shared by every part, plus per-part instance data.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::parts::Part;

/// Vertex data for the part mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unit box spanning [-1,1] on every axis, scaled per instance by the part's
/// half-extents
pub struct BoxMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl BoxMesh {
    pub fn new() -> Self {
        // (normal, tangent u, tangent v) with u × v = normal, so CCW faces out
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let base = vertices.len() as u16;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = normal + u * su + v * sv;
                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

impl Default for BoxMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-part instance data uploaded once per frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PartInstance {
    pub model: [[f32; 4]; 4],
    /// Emissive intensity in x; yzw unused
    pub emissive: [f32; 4],
}

impl PartInstance {
    pub fn from_part(part: &Part) -> Self {
        Self {
            model: model_matrix(part).to_cols_array_2d(),
            emissive: [part.emissive.unwrap_or(0.0), 0.0, 0.0, 0.0],
        }
    }
}

/// translation · rotation (XYZ Euler) · uniform scale · half-extents
pub fn model_matrix(part: &Part) -> Mat4 {
    let t = &part.transform;
    let rotation = Quat::from_euler(EulerRot::XYZ, t.rotation.x, t.rotation.y, t.rotation.z);
    Mat4::from_scale_rotation_translation(t.scale, rotation, t.position)
        * Mat4::from_scale(part.extents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ChoreographyPreset;
    use crate::parts::{PartId, PartRegistry};

    #[test]
    fn test_box_faces_point_outwards() {
        let mesh = BoxMesh::new();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
                let v = mesh.vertices[i as usize];
                (Vec3::from(v.position), Vec3::from(v.normal))
            });
            let face_normal = (b.0 - a.0).cross(c.0 - a.0).normalize();
            assert!((face_normal - a.1).length() < 1e-5);
        }
    }

    #[test]
    fn test_model_matrix_places_part() {
        let config = ChoreographyPreset::Standard.config();
        let registry = PartRegistry::from_specs(&config.parts, config.camera_start, 1.0).unwrap();
        let chamber = registry.get(PartId::Chamber).unwrap();

        let model = model_matrix(chamber);
        let top = model.transform_point3(Vec3::Y);
        assert!((top - Vec3::new(0.0, 15.0 + chamber.extents.y, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_instance_carries_emissive() {
        let config = ChoreographyPreset::Standard.config();
        let mut registry =
            PartRegistry::from_specs(&config.parts, config.camera_start, 1.0).unwrap();
        registry.get_mut(PartId::Core).unwrap().emissive = Some(1.5);

        let core = PartInstance::from_part(registry.get(PartId::Core).unwrap());
        assert_eq!(core.emissive[0], 1.5);
        let ring = PartInstance::from_part(registry.get(PartId::BaseRing).unwrap());
        assert_eq!(ring.emissive[0], 0.0);
    }
}
