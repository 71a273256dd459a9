pub mod check;
pub mod render;

pub use check::{CheckContext, CheckReport};
pub use render::{RenderContext, RenderOutcome};
