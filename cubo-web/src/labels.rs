/// Face number overlay drawn on a transparent 2D canvas
use cubo_core::{Camera, FaceLabel, RenderSurface};
use nalgebra::Matrix4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::gl::fit_canvas;

/// CSS pixel size of label text
const FONT_SIZE: f64 = 16.0;

pub(crate) struct LabelLayer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    pixel_ratio: f64,
}

impl LabelLayer {
    /// `None` when the browser cannot provide a 2D context for `canvas`
    pub(crate) fn create(canvas: HtmlCanvasElement, pixel_ratio: f64) -> Result<Option<Self>, JsValue> {
        let Some(context) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let context = context.dyn_into::<CanvasRenderingContext2d>()?;

        let style = canvas.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("top", "0")?;
        style.set_property("pointer-events", "none")?;

        Ok(Some(Self {
            canvas,
            context,
            pixel_ratio,
        }))
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub(crate) fn draw(
        &self,
        labels: &[FaceLabel],
        model: &Matrix4<f32>,
        camera: &Camera,
    ) -> Result<(), JsValue> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let ctx = &self.context;
        ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
        ctx.set_fill_style_str("white");
        ctx.set_font(&format!("{}px Arial", FONT_SIZE * self.pixel_ratio));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let world = Matrix4::identity();
        for label in labels {
            let Some(anchor) = label.visible_anchor(model, camera) else {
                continue;
            };
            if let Some((x, y, _)) = camera.project_to_screen(&anchor, &world, width, height) {
                ctx.fill_text(&label.text, f64::from(x), f64::from(y))?;
            }
        }
        Ok(())
    }
}

impl RenderSurface for LabelLayer {
    fn resize(&mut self, width: u32, height: u32) {
        fit_canvas(&self.canvas, width, height, self.pixel_ratio);
    }
}
