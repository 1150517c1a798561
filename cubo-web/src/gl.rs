/// WebGL2 drawing surface for the polyhedron.
///
/// Positions are uploaded once. Lit per-corner colors are computed on the
/// CPU each frame and streamed into a second buffer, so the shaders only
/// transform and interpolate.
use cubo_core::{Camera, Mesh, RenderSurface, Rgb, Transform};
use nalgebra::Matrix4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
in vec3 a_color;
uniform mat4 u_mvp;
out vec3 v_color;

void main() {
    v_color = a_color;
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec3 v_color;
out vec4 out_color;

void main() {
    out_color = vec4(v_color, 1.0);
}
"#;

pub(crate) struct GlSurface {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    color_buffer: WebGlBuffer,
    mvp_location: WebGlUniformLocation,
    vertex_count: i32,
    pixel_ratio: f64,
    background: [f32; 3],
}

impl GlSurface {
    pub(crate) fn new(
        canvas: HtmlCanvasElement,
        mesh: &Mesh,
        background: Rgb,
        pixel_ratio: f64,
    ) -> Result<Self, JsValue> {
        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("WebGL2 is not available"))?
            .dyn_into::<Gl>()?;

        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let positions = mesh.position_buffer();
        let vertex_count = (positions.len() / 3) as i32;
        create_attribute(&gl, &program, "a_position", &positions, Gl::STATIC_DRAW)?;
        let color_buffer = create_attribute(
            &gl,
            &program,
            "a_color",
            &vec![0.0; positions.len()],
            Gl::DYNAMIC_DRAW,
        )?;

        let mvp_location = gl
            .get_uniform_location(&program, "u_mvp")
            .ok_or_else(|| JsValue::from_str("shader has no u_mvp uniform"))?;

        // Faces wind counter-clockwise from outside
        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::CULL_FACE);

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            color_buffer,
            mvp_location,
            vertex_count,
            pixel_ratio,
            background: background.to_unit(),
        })
    }

    /// Draw one frame; `colors` holds an RGB triple per mesh corner
    pub(crate) fn draw(&self, colors: &[f32], model: &Matrix4<f32>, camera: &Camera) {
        let gl = &self.gl;
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        let [r, g, b] = self.background;
        gl.clear_color(r, g, b, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.color_buffer));
        let data = js_sys::Float32Array::from(colors);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::DYNAMIC_DRAW);

        let mvp = Transform::mvp_matrix(model, &camera.view_matrix(), &camera.projection_matrix());
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());

        gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);
    }
}

impl RenderSurface for GlSurface {
    fn resize(&mut self, width: u32, height: u32) {
        fit_canvas(&self.canvas, width, height, self.pixel_ratio);
    }
}

/// Size a canvas to `width` x `height` CSS pixels at the device pixel ratio
pub(crate) fn fit_canvas(canvas: &HtmlCanvasElement, width: u32, height: u32, pixel_ratio: f64) {
    canvas.set_width((f64::from(width) * pixel_ratio).round() as u32);
    canvas.set_height((f64::from(height) * pixel_ratio).round() as u32);
    let style = canvas.style();
    // Only fails for read-only declarations, which canvas styles are not
    let _ = style.set_property("width", &format!("{}px", width));
    let _ = style.set_property("height", &format!("{}px", height));
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".to_string());
        Err(JsValue::from_str(&log))
    }
}

fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("unable to create program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".to_string());
        Err(JsValue::from_str(&log))
    }
}

/// Upload `data` into a new buffer bound to the vec3 attribute `name`
fn create_attribute(
    gl: &Gl,
    program: &WebGlProgram,
    name: &str,
    data: &[f32],
    usage: u32,
) -> Result<WebGlBuffer, JsValue> {
    let location = gl.get_attrib_location(program, name);
    if location < 0 {
        return Err(JsValue::from_str(&format!("shader has no {} attribute", name)));
    }
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("unable to create buffer"))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &js_sys::Float32Array::from(data), usage);
    gl.enable_vertex_attrib_array(location as u32);
    gl.vertex_attrib_pointer_with_i32(location as u32, 3, Gl::FLOAT, false, 0, 0);
    Ok(buffer)
}
