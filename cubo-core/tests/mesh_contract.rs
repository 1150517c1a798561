/// The drawable mesh handed to shells agrees with the builder's tables.
use cubo_core::{
    build, face_labels, Palette, Rgb, RotationState, ShadingPolicy, Transform, DEFAULT_FACE_COLORS,
};
use cubo_core::polyhedron::FACE_COUNT;

#[test]
fn mesh_triangles_follow_face_order() {
    for policy in [ShadingPolicy::Flat, ShadingPolicy::Smooth] {
        let poly = build(policy);
        poly.validate().unwrap();
        let mesh = poly.to_mesh();
        assert_eq!(mesh.triangles.len(), FACE_COUNT);
        for (face, triangle) in mesh.triangles.iter().enumerate() {
            for (corner, vertex) in triangle.vertices.iter().enumerate() {
                assert_eq!(vertex.position, poly.vertices()[poly.faces()[face][corner]]);
                assert!(vertex.normal.dot(&vertex.position.coords) > 0.0);
            }
        }
    }
}

#[test]
fn palette_and_labels_line_up_with_triangles() {
    let poly = build(ShadingPolicy::Flat);
    let palette = Palette::default().for_faces(FACE_COUNT).unwrap();
    let labels = face_labels(&poly);
    for face in 0..FACE_COUNT {
        assert_eq!(labels[face].face, face);
        assert_eq!(labels[face].text, face.to_string());
        assert_eq!(
            palette.color_for(face),
            Rgb::parse_hex(DEFAULT_FACE_COLORS[face]).unwrap()
        );
    }
}

#[test]
fn outward_normals_survive_rotation() {
    let poly = build(ShadingPolicy::Flat);
    let model = Transform::rotation_matrix(&RotationState::new(0.8, -2.1));
    for face in 0..FACE_COUNT {
        let centroid = model.transform_point(&poly.centroid(face));
        let normal = model.transform_vector(&poly.face_normals()[face]);
        assert!(normal.dot(&centroid.coords) > 0.0);
    }
}
