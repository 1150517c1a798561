/// Error types shared by the mesh builder, palette and configuration layers

/// A mesh failed pre-deployment validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("face {face} repeats a vertex index: {indices:?}")]
    RepeatedIndex { face: usize, indices: [usize; 3] },

    #[error("face {face} is degenerate (area {area})")]
    Degenerate { face: usize, area: f32 },

    #[error("face {face} normal points inward (dot with centroid {dot})")]
    InwardNormal { face: usize, dot: f32 },

    #[error("vertex {vertex} is not referenced by any face")]
    OrphanVertex { vertex: usize },

    #[error("vertex {vertex} at {position:?} is not a permutation of (±1, ±1, 0)")]
    MisplacedVertex { vertex: usize, position: [f32; 3] },

    #[error("palette has {colors} colors but the mesh has {faces} faces")]
    PaletteTooShort { colors: usize, faces: usize },
}

/// A color string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}, expected #rrggbb or #rgb")]
    InvalidHex(String),
}

/// A scene configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("zoom bounds are inverted: min {min} is not below max {max}")]
    InvertedBounds { min: f32, max: f32 },

    #[error("initial distance {initial} lies outside [{min}, {max}]")]
    InitialOutOfBounds { initial: f32, min: f32, max: f32 },

    #[error("field of view {0} degrees lies outside (0, 180)")]
    FieldOfView(f32),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
