/// Cubo Web - WebGL2 cuboctahedron viewer for the browser
///
/// ```js
/// import init, { mount } from "./cubo_web.js";
/// await init();
/// const viewer = mount("viewer", JSON.stringify({ shading: "smooth" }));
/// // later
/// viewer.unmount();
/// ```
use std::cell::RefCell;
use std::rc::Rc;

use cubo_core::{build, face_labels, Camera, SceneConfig, ViewRig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

mod gl;
mod labels;
mod mount;
mod scene;

use gl::GlSurface;
use labels::LabelLayer;
use mount::Mounted;
use scene::{Scene, Surfaces};

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Current viewport size in CSS pixels
fn viewport_size(window: &Window) -> (u32, u32) {
    let dimension = |value: Result<JsValue, JsValue>, fallback: f64| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback).max(0.0) as u32
    };
    (
        dimension(window.inner_width(), 800.0),
        dimension(window.inner_height(), 600.0),
    )
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("created element is not a canvas"))
}

/// A mounted viewer. Dropping it, or calling `unmount`, removes it from the page.
#[wasm_bindgen]
pub struct Viewer {
    scene: Rc<RefCell<Scene>>,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl Viewer {
    /// Detach listeners, stop the frame loop and remove the canvases.
    /// Calling it again is a no-op.
    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            console::info_1(&JsValue::from_str("cuboctahedron viewer unmounted"));
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mounted.is_some()
    }

    #[wasm_bindgen(getter, js_name = rotationX)]
    pub fn rotation_x(&self) -> f32 {
        self.scene.borrow().rig().state().rotation.x
    }

    #[wasm_bindgen(getter, js_name = rotationY)]
    pub fn rotation_y(&self) -> f32 {
        self.scene.borrow().rig().state().rotation.y
    }

    #[wasm_bindgen(getter, js_name = cameraDistance)]
    pub fn camera_distance(&self) -> f32 {
        self.scene.borrow().rig().state().camera_distance
    }
}

/// Mount a viewer filling the viewport inside the element `container_id`.
///
/// `config_json` is an optional JSON scene configuration; omitted fields
/// take their defaults.
#[wasm_bindgen]
pub fn mount(container_id: &str, config_json: Option<String>) -> Result<Viewer, JsValue> {
    let config = match config_json {
        Some(json) => SceneConfig::from_json(&json).map_err(to_js)?,
        None => SceneConfig::default(),
    };

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {:?}", container_id)))?;

    let poly = build(config.shading);
    let report = poly.validate().map_err(to_js)?;
    console::info_1(&JsValue::from_str(&format!(
        "cuboctahedron ready: {} vertices, {} faces, {} edges",
        report.vertex_count, report.face_count, report.edge_count
    )));
    let mesh = poly.to_mesh();
    let palette = config.palette().map_err(to_js)?;
    let background = config.background_color().map_err(to_js)?;

    let (width, height) = viewport_size(&window);
    let pixel_ratio = window.device_pixel_ratio();
    let mut mounted = Mounted::new(window.clone(), container);

    let gl_canvas = create_canvas(&document)?;
    gl_canvas.style().set_property("display", "block")?;
    mounted.attach(&gl_canvas)?;
    let gl = GlSurface::new(gl_canvas, &mesh, background, pixel_ratio)?;

    let labels = if config.show_labels {
        match LabelLayer::create(create_canvas(&document)?, pixel_ratio)? {
            Some(layer) => {
                mounted.position_container()?;
                mounted.attach(layer.canvas())?;
                Some(layer)
            }
            None => {
                console::warn_1(&JsValue::from_str(
                    "2D canvas context unavailable, face labels disabled",
                ));
                None
            }
        }
    } else {
        None
    };

    let rig = ViewRig::new(config.rig);
    let camera = Camera::new(width, height).with_fov_degrees(config.fov_degrees);
    let scene = Rc::new(RefCell::new(Scene::new(
        rig,
        camera,
        Surfaces { gl, labels },
        mesh,
        palette,
        face_labels(&poly),
    )));
    scene.borrow_mut().resize(width, height);

    {
        let scene = Rc::clone(&scene);
        mounted.listen("mousedown", move |_| scene.borrow_mut().rig_mut().on_pointer_down())?;
    }
    {
        let scene = Rc::clone(&scene);
        mounted.listen("mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                scene
                    .borrow_mut()
                    .rig_mut()
                    .on_pointer_move(event.client_x() as f32, event.client_y() as f32);
            }
        })?;
    }
    {
        let scene = Rc::clone(&scene);
        mounted.listen("mouseup", move |_| scene.borrow_mut().rig_mut().on_pointer_up())?;
    }
    {
        let scene = Rc::clone(&scene);
        mounted.listen("wheel", move |event| {
            if let Some(event) = event.dyn_ref::<WheelEvent>() {
                scene.borrow_mut().rig_mut().on_scroll(event.delta_y() as f32);
            }
        })?;
    }
    {
        let scene = Rc::clone(&scene);
        let window = window.clone();
        mounted.listen("resize", move |_| {
            let (width, height) = viewport_size(&window);
            scene.borrow_mut().resize(width, height);
        })?;
    }

    mounted.start_frames(Rc::clone(&scene))?;

    Ok(Viewer {
        scene,
        mounted: Some(mounted),
    })
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    Ok(())
}
