use crate::animation::Animation;
use crate::error::{SceneError, SceneResult};
use crate::geometry::Frame;
use crate::mobject::{Element, ElementId, Mobject, Role};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Element registered with the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedElement {
    pub id: ElementId,
    pub role: Role,
    pub element: Element,
}

impl StagedElement {
    /// Short human label for summaries
    pub fn label(&self) -> String {
        match &self.element {
            Element::Text(text) => {
                let mut label: String = text.content.chars().take(32).collect();
                if text.content.chars().count() > 32 {
                    label.push('…');
                }
                format!("\"{}\"", label)
            }
            Element::Code(code) => format!("code ({} lines)", code.line_count()),
            Element::Outline(_) => "outline".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Play { animations: Vec<Animation> },
    Wait,
}

/// One `play` or `wait` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub start: f32,
    pub duration: f32,
    pub kind: StepKind,
    pub stage_before: Vec<ElementId>,
    pub stage_after: Vec<ElementId>,
}

impl Step {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    pub fn animations(&self) -> &[Animation] {
        match &self.kind {
            StepKind::Play { animations } => animations,
            StepKind::Wait => &[],
        }
    }

    pub fn animation_for(&self, id: ElementId) -> Option<&Animation> {
        self.animations().iter().find(|a| a.target == id)
    }

    pub fn is_wait(&self) -> bool {
        matches!(self.kind, StepKind::Wait)
    }

    /// Elements drawn while the step runs, in draw order
    pub fn visible_during(&self) -> Vec<ElementId> {
        let mut visible = self.stage_before.clone();
        for anim in self.animations() {
            if anim.kind.introduces() && !visible.contains(&anim.target) {
                visible.push(anim.target);
            }
        }
        visible
    }

    /// Linear progress in `[0, 1]` at scene time `t`
    pub fn progress_at(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// Ordered record of everything a scene plays.
///
/// Owns the scene's elements; `play` and `wait` append steps strictly one
/// after another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    frame: Frame,
    elements: Vec<StagedElement>,
    steps: Vec<Step>,
    stage: Vec<ElementId>,
    clock: f32,
}

impl Timeline {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            elements: Vec::new(),
            steps: Vec::new(),
            stage: Vec::new(),
            clock: 0.0,
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Register an element. It is not on stage until an animation introduces it.
    pub fn add(&mut self, role: Role, element: impl Into<Element>) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(StagedElement {
            id,
            role,
            element: element.into(),
        });
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).map(|e| &e.element)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0).map(|e| &mut e.element)
    }

    pub fn staged(&self, id: ElementId) -> Option<&StagedElement> {
        self.elements.get(id.0)
    }

    pub fn role(&self, id: ElementId) -> Option<Role> {
        self.elements.get(id.0).map(|e| e.role)
    }

    pub fn elements(&self) -> &[StagedElement] {
        &self.elements
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Elements currently on stage
    pub fn stage(&self) -> &[ElementId] {
        &self.stage
    }

    /// Index the next recorded step will get
    pub fn next_step_index(&self) -> usize {
        self.steps.len()
    }

    pub fn total_duration(&self) -> f32 {
        self.clock
    }

    /// Play `animations` together. Without `run_time` the step lasts as long
    /// as the slowest animation's default.
    pub fn play(&mut self, animations: Vec<Animation>, run_time: Option<f32>) -> SceneResult<&Step> {
        if animations.is_empty() {
            return Err(SceneError::timeline("play called without animations"));
        }

        let mut default_run_time: f32 = 0.0;
        for (i, anim) in animations.iter().enumerate() {
            let element = self.element(anim.target).ok_or_else(|| {
                SceneError::timeline(format!("animation targets unknown element {:?}", anim.target))
            })?;
            if animations[..i].iter().any(|a| a.target == anim.target) {
                return Err(SceneError::timeline(format!(
                    "element {:?} is animated twice in one step",
                    anim.target
                )));
            }
            if anim.kind.removes()
                && !anim.kind.introduces()
                && !self.stage.contains(&anim.target)
            {
                return Err(SceneError::timeline(format!(
                    "{} targets element {:?} which is not on stage",
                    anim.kind.label(),
                    anim.target
                )));
            }
            default_run_time = default_run_time.max(anim.default_run_time(element.glyph_count()));
        }

        let duration = match run_time {
            Some(t) if t.is_finite() && t > 0.0 => t,
            Some(t) => {
                return Err(SceneError::timeline(format!(
                    "run time must be positive, got {}",
                    t
                )))
            }
            None => default_run_time,
        };

        let stage_before = self.stage.clone();
        for anim in &animations {
            if anim.kind.introduces() && !self.stage.contains(&anim.target) {
                self.stage.push(anim.target);
            }
        }
        for anim in &animations {
            if anim.kind.removes() {
                self.stage.retain(|id| *id != anim.target);
            }
        }

        debug!(
            step = self.steps.len(),
            start = self.clock,
            duration,
            animations = animations.len(),
            "play"
        );

        self.push_step(StepKind::Play { animations }, duration, stage_before)
    }

    /// Hold the current stage for `duration` seconds
    pub fn wait(&mut self, duration: f32) -> SceneResult<&Step> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SceneError::timeline(format!(
                "wait duration must be positive, got {}",
                duration
            )));
        }
        debug!(step = self.steps.len(), start = self.clock, duration, "wait");
        let stage_before = self.stage.clone();
        self.push_step(StepKind::Wait, duration, stage_before)
    }

    fn push_step(
        &mut self,
        kind: StepKind,
        duration: f32,
        stage_before: Vec<ElementId>,
    ) -> SceneResult<&Step> {
        let index = self.steps.len();
        self.steps.push(Step {
            index,
            start: self.clock,
            duration,
            kind,
            stage_before,
            stage_after: self.stage.clone(),
        });
        self.clock += duration;
        self.steps
            .last()
            .ok_or_else(|| SceneError::timeline("step was not recorded"))
    }

    /// Step running at scene time `t`; `None` once the timeline has ended
    pub fn step_at(&self, t: f32) -> Option<&Step> {
        let idx = self.steps.partition_point(|s| s.end() <= t);
        self.steps.get(idx).filter(|s| t >= s.start)
    }

    /// Frames needed to cover the whole timeline at `fps`
    pub fn frame_count(&self, fps: u32) -> u32 {
        (self.clock * fps as f32).ceil() as u32
    }

    pub fn frame_to_time(frame: u32, fps: u32) -> f32 {
        if fps == 0 {
            return 0.0;
        }
        frame as f32 / fps as f32
    }

    pub fn step_at_frame(&self, frame: u32, fps: u32) -> Option<&Step> {
        self.step_at(Self::frame_to_time(frame, fps))
    }

    /// SHA-256 over the serialized elements and steps
    pub fn fingerprint(&self) -> SceneResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&self.elements).map_err(anyhow::Error::from)?);
        hasher.update(serde_json::to_vec(&self.steps).map_err(anyhow::Error::from)?);
        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(&self.steps).map_err(anyhow::Error::from)?)
    }

    /// Human readable step listing
    pub fn summarize(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("Elements: {}\n", self.elements.len()));
        summary.push_str(&format!("Steps: {}\n", self.steps.len()));
        summary.push_str(&format!("Duration: {:.2}s\n", self.clock));

        for step in &self.steps {
            let what = match &step.kind {
                StepKind::Wait => "Wait".to_string(),
                StepKind::Play { animations } => animations
                    .iter()
                    .map(|a| {
                        let label = self
                            .staged(a.target)
                            .map(StagedElement::label)
                            .unwrap_or_default();
                        format!("{}({})", a.kind.label(), label)
                    })
                    .collect::<Vec<_>>()
                    .join(" + "),
            };
            summary.push_str(&format!(
                "  [{:02}] {:6.2}s +{:.2}s  {}\n",
                step.index, step.start, step.duration, what
            ));
        }

        summary
    }
}
