/// Numeric face labels anchored just outside each triangle
use nalgebra::{Matrix4, Point3, Vector3};

use crate::polyhedron::Polyhedron;
use crate::projection::Camera;

/// How far a label floats off its face, along the face normal
pub const LABEL_OFFSET: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct FaceLabel {
    pub face: usize,
    pub text: String,
    /// Model-space anchor point
    pub anchor: Point3<f32>,
    /// Model-space outward normal of the labelled face
    pub normal: Vector3<f32>,
}

impl FaceLabel {
    /// World-space anchor, if the labelled face points at the camera
    pub fn visible_anchor(&self, model: &Matrix4<f32>, camera: &Camera) -> Option<Point3<f32>> {
        let anchor = model.transform_point(&self.anchor);
        let normal = model.transform_vector(&self.normal);
        camera.sees(&anchor, &normal).then_some(anchor)
    }
}

/// One label per triangle, in face-emission order
pub fn face_labels(poly: &Polyhedron) -> Vec<FaceLabel> {
    poly.face_normals()
        .iter()
        .enumerate()
        .map(|(face, normal)| FaceLabel {
            face,
            text: face.to_string(),
            anchor: poly.centroid(face) + normal * LABEL_OFFSET,
            normal: *normal,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedron::{cuboctahedron, FACE_COUNT};
    use crate::transform::{RotationState, Transform};

    #[test]
    fn test_one_label_per_face_in_order() {
        let labels = face_labels(&cuboctahedron());
        assert_eq!(labels.len(), FACE_COUNT);
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(label.face, i);
            assert_eq!(label.text, i.to_string());
        }
    }

    #[test]
    fn test_anchors_sit_outside_their_face() {
        let poly = cuboctahedron();
        for label in face_labels(&poly) {
            let centroid = poly.centroid(label.face);
            assert!(label.anchor.coords.norm() > centroid.coords.norm());
        }
    }

    #[test]
    fn test_only_front_faces_are_visible() {
        let poly = cuboctahedron();
        let camera = Camera::default();
        let model = Transform::rotation_matrix(&RotationState::zero());
        let labels = face_labels(&poly);

        // +z square halves face the camera, -z halves face away
        let front: Vec<_> = labels
            .iter()
            .filter(|l| l.normal.z > 0.99)
            .collect();
        let back: Vec<_> = labels
            .iter()
            .filter(|l| l.normal.z < -0.99)
            .collect();
        assert_eq!(front.len(), 2);
        assert_eq!(back.len(), 2);
        assert!(front.iter().all(|l| l.visible_anchor(&model, &camera).is_some()));
        assert!(back.iter().all(|l| l.visible_anchor(&model, &camera).is_none()));
    }
}
