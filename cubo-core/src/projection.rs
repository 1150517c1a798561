/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective camera looking at the origin down -Z
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 75f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    /// Distance from the camera to the point it looks at
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Dolly along +Z so the camera sits `distance` in front of the target
    pub fn set_distance(&mut self, distance: f32) {
        self.position = self.target + Vector3::z() * distance;
    }

    /// Recompute the aspect ratio for a viewport; a zero dimension keeps the old ratio
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Whether a surface at world-space `point` with outward `normal` faces the camera
    pub fn sees(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> bool {
        normal.dot(&(self.position - point)) > 0.0
    }

    /// Project a 3D point to 2D screen space as `(x, y, depth)`.
    ///
    /// Points behind the camera yield `None`. Points outside the viewport are
    /// still returned so callers can clip whole primitives themselves.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
        assert_relative_eq!(camera.distance(), 5.0);
        assert_relative_eq!(camera.fov, 75f32.to_radians());
    }

    #[test]
    fn test_set_distance_moves_along_z() {
        let mut camera = Camera::default();
        camera.set_distance(2.5);
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 2.5));
        assert_relative_eq!(camera.distance(), 2.5);
    }

    #[test]
    fn test_zero_height_viewport_keeps_aspect() {
        let mut camera = Camera::new(400, 200);
        camera.set_viewport(300, 0);
        assert_relative_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_zero_width_viewport_keeps_aspect() {
        let mut camera = Camera::new(400, 200);
        camera.set_viewport(0, 600);
        assert_relative_eq!(camera.aspect, 2.0);
        assert!(camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 0, 600)
            .is_some());
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(800, 600);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(y, 300.0, epsilon = 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::default();
        let model = Matrix4::identity();
        let (_, _, near) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 1.0), &model, 800, 600)
            .unwrap();
        let (_, _, far) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -1.0), &model, 800, 600)
            .unwrap();
        assert!(near < far);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::default();
        let behind = Point3::new(0.0, 0.0, 6.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_sees_only_front_faces() {
        let camera = Camera::default();
        let point = Point3::new(0.0, 0.0, 1.0);
        assert!(camera.sees(&point, &Vector3::z()));
        assert!(!camera.sees(&point, &-Vector3::z()));
    }

    #[test]
    fn test_up_projects_upward_on_screen() {
        let camera = Camera::default();
        let (_, y, _) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!(y < 300.0);
    }
}
