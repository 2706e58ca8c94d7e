//! Pathways map core (host-agnostic)
//!
//! Stylized delivery map: a rotated street grid and building silhouette,
//! plus a frame-driven animator moving a vehicle along a cyclic scripted
//! path. Hosts (the wasm adapter, native tools, tests) supply the frame
//! scheduler and draw the outputs.

pub mod animator;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod outputs;
pub mod path;
pub mod scene;
pub mod scheduler;
pub mod svg;

// Re-exports for consumers (adapters)
pub use animator::{AdvancePolicy, AnimationState, AnimatorConfig, PathAnimator};
pub use config::{BuildingPartSpec, GridConfig, MapConfig, Palette, ViewBox};
pub use error::MapError;
pub use frame_loop::{AnimationLoop, FrameListener};
pub use geometry::{rotate_point, scale_point, MapTransform, Point};
pub use outputs::{AnimatorEvent, FrameSnapshot};
pub use path::{LegKind, Path, Waypoint};
pub use scene::{BuildingPart, GridLine, GroupRotation, MapScene, PinGlyph};
pub use scheduler::{FrameCallback, FrameScheduler, ManualScheduler};

/// Map core result type
pub type Result<T> = core::result::Result<T, MapError>;
