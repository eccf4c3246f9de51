//! # Error Module
//!
//! Errors surfaced by the wire engine. Ordinary grid conditions (unloaded neighbours,
//! positions at the edge of the world) are never errors; they resolve to "no
//! connection". What remains are configuration problems and corrupted primitive
//! tables, which must reach the caller instead of being papered over with an empty
//! shape.

use std::path::PathBuf;

use cgmath::Point3;

/// Which primitive table a shape belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// One of the 6 per-face node shapes.
    Node,
    /// One of the 24 per-face, per-secondary-direction line shapes.
    Line,
    /// One of the 12 cube-edge shapes.
    Edge,
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveKind::Node => write!(f, "node"),
            PrimitiveKind::Line => write!(f, "line"),
            PrimitiveKind::Edge => write!(f, "edge"),
        }
    }
}

/// The crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A primitive shape table entry has no geometry.
    #[error("{kind} primitive {index} is empty")]
    EmptyPrimitive {
        /// The table holding the empty shape.
        kind: PrimitiveKind,
        /// Position of the shape in its table.
        index: usize,
    },

    /// Composition produced no geometry for an index that selects at least one primitive.
    #[error("composition of expanded index {index:#x} produced an empty shape")]
    EmptyComposition {
        /// The raw expanded index bits.
        index: u64,
    },

    /// Wire geometry parameters are out of range.
    #[error("invalid wire geometry: {0}")]
    InvalidGeometry(String),

    /// Cache settings are out of range.
    #[error("invalid cache config: {0}")]
    InvalidCacheConfig(String),

    /// A write targeted a chunk that is not loaded.
    #[error("chunk at {position:?} is not loaded")]
    ChunkNotLoaded {
        /// Chunk coordinates of the missing chunk.
        position: Point3<i32>,
    },

    /// The configuration file could not be read.
    #[error("failed to read config {path:?}")]
    ConfigIo {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A background worker thread could not be started.
    #[error("failed to spawn worker {name:?}")]
    WorkerSpawn {
        /// Name of the worker thread.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("failed to parse config")]
    ConfigParse(#[from] serde_json::Error),
}
