/// Per-viewer state shared by the event listeners and the frame loop
use cubo_core::{Camera, FaceLabel, Lighting, Mesh, Palette, RenderSurface, ViewRig};
use nalgebra::Matrix4;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::gl::GlSurface;
use crate::labels::LabelLayer;

/// The WebGL canvas plus the optional label overlay, resized together
pub(crate) struct Surfaces {
    pub(crate) gl: GlSurface,
    pub(crate) labels: Option<LabelLayer>,
}

impl RenderSurface for Surfaces {
    fn resize(&mut self, width: u32, height: u32) {
        self.gl.resize(width, height);
        if let Some(labels) = &mut self.labels {
            labels.resize(width, height);
        }
    }
}

pub(crate) struct Scene {
    rig: ViewRig,
    camera: Camera,
    surfaces: Surfaces,
    mesh: Mesh,
    palette: Palette,
    lighting: Lighting,
    labels: Vec<FaceLabel>,
    colors: Vec<f32>,
}

impl Scene {
    pub(crate) fn new(
        rig: ViewRig,
        camera: Camera,
        surfaces: Surfaces,
        mesh: Mesh,
        palette: Palette,
        labels: Vec<FaceLabel>,
    ) -> Self {
        let colors = Vec::with_capacity(mesh.triangles.len() * 9);
        Self {
            rig,
            camera,
            surfaces,
            mesh,
            palette,
            lighting: Lighting::default(),
            labels,
            colors,
        }
    }

    pub(crate) fn rig(&self) -> &ViewRig {
        &self.rig
    }

    pub(crate) fn rig_mut(&mut self) -> &mut ViewRig {
        &mut self.rig
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.rig
            .on_viewport_resize(&mut self.camera, &mut self.surfaces, width, height);
    }

    /// Advance the idle spin and draw one frame
    pub(crate) fn frame(&mut self) {
        self.rig.on_idle_step();
        let model = self.rig.model_matrix();
        self.rig.place_camera(&mut self.camera);

        self.shade(&model);
        self.surfaces.gl.draw(&self.colors, &model, &self.camera);

        if let Some(layer) = &self.surfaces.labels {
            if let Err(err) = layer.draw(&self.labels, &model, &self.camera) {
                console::error_2(&JsValue::from_str("failed to draw face labels:"), &err);
            }
        }
    }

    /// Fill `colors` with the lit RGB of every mesh corner
    fn shade(&mut self, model: &Matrix4<f32>) {
        self.colors.clear();
        for (face, triangle) in self.mesh.triangles.iter().enumerate() {
            let base = self.palette.color_for(face);
            for vertex in &triangle.vertices {
                let normal = model.transform_vector(&vertex.normal).normalize();
                self.colors
                    .extend_from_slice(&self.lighting.shade(base, &normal).to_unit());
            }
        }
    }
}
