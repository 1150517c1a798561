/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use cubo_core::{Camera, FaceLabel, Lighting, Mesh, Palette, RenderSurface, Rgb, Triangle};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Virtual pixels covered by one terminal cell, so pixel-tuned view
/// constants behave as they do in a browser.
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Option<Rgb>,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: None,
};

/// ASCII renderer that converts 3D meshes to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Character at a cell, `None` outside the buffer
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col].character)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Draw every front-facing triangle, painting triangle `i` with palette color `i`
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        palette: &Palette,
        lighting: &Lighting,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        for (face, triangle) in mesh.triangles.iter().enumerate() {
            self.render_triangle(triangle, palette.color_for(face), lighting, model_matrix, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        base: Rgb,
        lighting: &Lighting,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        // Averaging the supplied corner normals; flat meshes carry one normal per face
        let normal: Vector3<f32> = triangle.vertices.iter().map(|v| v.normal).sum();
        let normal = model_matrix.transform_vector(&normal).normalize();
        let centroid = model_matrix.transform_point(&triangle.centroid());
        if !camera.sees(&centroid, &normal) {
            return;
        }

        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        let color = lighting.shade(base, &normal);
        let char_index = (color.luminance() * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        // Keep lit faces visible even when very dark
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: Some(color),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Overlay the numbers of faces that point at the camera
    pub fn render_labels(&mut self, labels: &[FaceLabel], model_matrix: &Matrix4<f32>, camera: &Camera) {
        let world = Matrix4::identity();
        for label in labels {
            let Some(anchor) = label.visible_anchor(model_matrix, camera) else {
                continue;
            };
            let Some((x, y, _)) =
                camera.project_to_screen(&anchor, &world, self.width as u32, self.height as u32)
            else {
                continue;
            };
            let row = y.floor() as i32;
            let start = x.round() as i32 - label.text.len() as i32 / 2;
            for (offset, character) in label.text.chars().enumerate() {
                let col = start + offset as i32;
                if row < 0 || col < 0 || row >= self.height as i32 || col >= self.width as i32 {
                    continue;
                }
                let idx = row as usize * self.width + col as usize;
                self.cells[idx] = Cell {
                    character,
                    color: Some(Rgb::WHITE),
                };
                self.depth_buffer[idx] = f32::NEG_INFINITY;
            }
        }
    }

    /// Write the grid, addressing each row directly so the last one never scrolls
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Rgb> = None;
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            writer.queue(MoveTo(0, y as u16))?;
            for cell in row {
                if let Some(color) = cell.color {
                    if current != Some(color) {
                        writer.queue(SetForegroundColor(Color::Rgb {
                            r: color.r,
                            g: color.g,
                            b: color.b,
                        }))?;
                        current = Some(color);
                    }
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderSurface for AsciiRenderer {
    /// Resize to the cell grid covering `width` x `height` virtual pixels
    fn resize(&mut self, width: u32, height: u32) {
        *self = AsciiRenderer::new((width / CELL_WIDTH) as usize, (height / CELL_HEIGHT) as usize);
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
