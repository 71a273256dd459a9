pub mod async_processing;
pub mod content;

use crate::error::{SceneError, SceneResult};
use crate::geometry::Frame;
use crate::renderer::Timeline;
use tracing::info;

pub use async_processing::AsyncProcessingExplanation;

/// A renderable scene. `construct` records everything the scene plays.
pub trait Scene {
    fn name(&self) -> &'static str;

    fn construct(&mut self, timeline: &mut Timeline) -> SceneResult<()>;
}

/// Names accepted by [`scene_by_name`]
pub const SCENE_NAMES: &[&str] = &[AsyncProcessingExplanation::NAME];

pub fn scene_by_name(name: &str) -> SceneResult<Box<dyn Scene>> {
    match name {
        AsyncProcessingExplanation::NAME => Ok(Box::new(AsyncProcessingExplanation)),
        _ => Err(SceneError::UnknownScene {
            name: name.to_string(),
            known: SCENE_NAMES.join(", "),
        }),
    }
}

/// Construct `scene` on a fresh timeline
pub fn build(scene: &mut dyn Scene, frame: Frame) -> SceneResult<Timeline> {
    let mut timeline = Timeline::new(frame);
    scene.construct(&mut timeline)?;
    info!(
        scene = scene.name(),
        steps = timeline.steps().len(),
        duration = timeline.total_duration(),
        "scene constructed"
    );
    Ok(timeline)
}
