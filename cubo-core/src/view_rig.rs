/// Drag-to-orbit and scroll-to-zoom over a single drawable group.
///
/// A [`ViewRig`] owns the only mutable view state of a mounted scene. Shells
/// forward host pointer, wheel and resize notifications to its handlers,
/// call [`ViewRig::on_idle_step`] once per display refresh, and read
/// [`ViewRig::state`] once per frame to orient the group and place the camera.
use nalgebra::Matrix4;
use tracing::debug;

use crate::config::RigConfig;
use crate::projection::Camera;
use crate::transform::{RotationState, Transform};

/// Something that can be resized to a viewport's pixel dimensions
pub trait RenderSurface {
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub dragging: bool,
    pub last_pointer: (f32, f32),
    pub rotation: RotationState,
    pub camera_distance: f32,
}

#[derive(Debug, Clone)]
pub struct ViewRig {
    state: ViewState,
    config: RigConfig,
}

impl ViewRig {
    pub fn new(config: RigConfig) -> Self {
        Self {
            state: ViewState {
                dragging: false,
                last_pointer: (0.0, 0.0),
                rotation: RotationState::zero(),
                camera_distance: config.initial_distance,
            },
            config,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn on_pointer_down(&mut self) {
        self.state.dragging = true;
    }

    /// Rotate by the pointer travel since the previous move while dragging.
    /// The last pointer position is recorded on every move, dragging or not.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.state.dragging {
            let (last_x, last_y) = self.state.last_pointer;
            let k = self.config.drag_sensitivity;
            self.state.rotation.rotate((y - last_y) * k, (x - last_x) * k);
        }
        self.state.last_pointer = (x, y);
    }

    pub fn on_pointer_up(&mut self) {
        self.state.dragging = false;
    }

    pub fn on_scroll(&mut self, delta_y: f32) {
        let distance = self.state.camera_distance + delta_y * self.config.zoom_speed;
        self.state.camera_distance =
            distance.clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Constant auto-spin, suppressed while a drag is in progress
    pub fn on_idle_step(&mut self) {
        if !self.state.dragging {
            self.state
                .rotation
                .rotate(self.config.idle_spin_x, self.config.idle_spin_y);
        }
    }

    pub fn on_viewport_resize<S: RenderSurface + ?Sized>(
        &self,
        camera: &mut Camera,
        surface: &mut S,
        width: u32,
        height: u32,
    ) {
        debug!(width, height, "viewport resized");
        camera.set_viewport(width, height);
        surface.resize(width, height);
    }

    /// Orientation of the drawable group for this frame
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::rotation_matrix(&self.state.rotation)
    }

    /// Move the camera to the current zoom distance
    pub fn place_camera(&self, camera: &mut Camera) {
        camera.set_distance(self.state.camera_distance);
    }
}

impl Default for ViewRig {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}
