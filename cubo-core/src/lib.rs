/// Cubo Core Library - Cuboctahedron geometry and view control
///
/// This library provides the renderer-independent part of the viewer: the
/// cuboctahedron mesh builder, the drag/zoom view rig, and the camera,
/// palette, lighting and label helpers shared by the terminal and web shells.

pub mod config;
pub mod error;
pub mod geometry;
pub mod labels;
pub mod lighting;
pub mod palette;
pub mod polyhedron;
pub mod projection;
pub mod transform;
pub mod view_rig;

// Re-export commonly used types
pub use config::{RigConfig, SceneConfig};
pub use error::{ColorError, ConfigError, MeshError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use labels::{face_labels, FaceLabel};
pub use lighting::{DirectionalLight, Lighting};
pub use palette::{Palette, Rgb, DEFAULT_FACE_COLORS};
pub use polyhedron::{build, cuboctahedron, FaceKind, Normals, Polyhedron, ShadingPolicy};
pub use projection::Camera;
pub use transform::{RotationState, Transform};
pub use view_rig::{RenderSurface, ViewRig, ViewState};
