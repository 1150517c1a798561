/// Terminal presentation shell for the cuboctahedron viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use cubo_core::{
    build, face_labels, Camera, FaceLabel, Lighting, Mesh, Palette, SceneConfig, ViewRig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

pub mod guard;
pub mod renderer;

pub use guard::TerminalGuard;
pub use renderer::{AsciiRenderer, CELL_HEIGHT, CELL_WIDTH};

/// Wheel delta reported per scroll notch, matching a browser's line scroll
pub const WHEEL_STEP: f32 = 100.0;

fn invalid_data<E>(err: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// Map a terminal cell to the virtual pixel at its top-left corner
pub fn cell_to_pixels(col: u16, row: u16) -> (f32, f32) {
    ((col as u32 * CELL_WIDTH) as f32, (row as u32 * CELL_HEIGHT) as f32)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    palette: Palette,
    lighting: Lighting,
    labels: Vec<FaceLabel>,
    rig: ViewRig,
    camera: Camera,
    renderer: AsciiRenderer,
    show_labels: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &SceneConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Self::with_size(config, cols, rows)
    }

    /// Build the scene for a terminal of `cols` x `rows` cells
    pub fn with_size(config: &SceneConfig, cols: u16, rows: u16) -> io::Result<Self> {
        let poly = build(config.shading);
        let report = poly.validate().map_err(invalid_data)?;
        info!(?report, "geometry ready");

        let palette = config.palette().map_err(invalid_data)?;
        let rig = ViewRig::new(config.rig);
        let (width, height) = (cols as u32 * CELL_WIDTH, rows as u32 * CELL_HEIGHT);
        let mut camera = Camera::new(width, height).with_fov_degrees(config.fov_degrees);
        rig.place_camera(&mut camera);

        Ok(Self {
            mesh: poly.to_mesh(),
            labels: face_labels(&poly),
            palette,
            lighting: Lighting::default(),
            rig,
            camera,
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            show_labels: config.show_labels,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn rig(&self) -> &ViewRig {
        &self.rig
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn labels_visible(&self) -> bool {
        self.show_labels
    }

    pub fn run(&mut self) -> io::Result<()> {
        let _guard = TerminalGuard::acquire()?;
        self.main_loop()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.rig.on_idle_step();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Route a terminal event to the view rig or the app controls
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('l') => {
                    self.show_labels = !self.show_labels;
                }
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let (x, y) = cell_to_pixels(column, row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.rig.on_pointer_down(),
                    MouseEventKind::Up(MouseButton::Left) => self.rig.on_pointer_up(),
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        self.rig.on_pointer_move(x, y)
                    }
                    MouseEventKind::ScrollDown => self.rig.on_scroll(WHEEL_STEP),
                    MouseEventKind::ScrollUp => self.rig.on_scroll(-WHEEL_STEP),
                    _ => {}
                }
            }
            Event::Resize(cols, rows) => {
                self.rig.on_viewport_resize(
                    &mut self.camera,
                    &mut self.renderer,
                    cols as u32 * CELL_WIDTH,
                    rows as u32 * CELL_HEIGHT,
                );
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.rig.model_matrix();
        self.rig.place_camera(&mut self.camera);

        self.renderer.clear();
        self.renderer
            .render_mesh(&self.mesh, &self.palette, &self.lighting, &model, &self.camera);
        if self.show_labels {
            self.renderer.render_labels(&self.labels, &model, &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Cuboctahedron | FPS: {:.1} | Zoom: {:.2} | Drag=Rotate Scroll=Zoom L=Labels Q=Quit",
                self.fps,
                self.rig.state().camera_distance
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
