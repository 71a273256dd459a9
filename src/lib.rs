pub mod analysis;
pub mod animation;
pub mod code;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod mobject;
pub mod renderer;
pub mod scene;
pub mod style;

pub use animation::{Animation, AnimationKind, RateFunc};
pub use code::{CodeBlock, Region};
pub use error::{SceneError, SceneResult};
pub use mobject::{Element, ElementId, Mobject, Role, TextBlock};
pub use renderer::{Compositor, FrameBuffer, RenderEngine, Timeline};
pub use scene::{AsyncProcessingExplanation, Scene};
