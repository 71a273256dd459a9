use crate::mobject::ElementId;
use serde::{Deserialize, Serialize};

/// Elements with fewer glyphs than this are written in one second, longer ones in two
pub const WRITE_LONG_THRESHOLD: usize = 15;

/// Default width of the travelling flash, as a fraction of the outline perimeter
pub const FLASH_TIME_WIDTH: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationKind {
    /// Reveal glyphs left to right
    Write,
    /// Draw the outline/background, then reveal glyphs
    Create,
    FadeOut,
    /// A short segment travels along the target's outline, then the target is removed
    ShowPassingFlash { time_width: f32 },
}

impl AnimationKind {
    /// Adds its target to the stage when the step starts
    pub fn introduces(&self) -> bool {
        matches!(
            self,
            AnimationKind::Write | AnimationKind::Create | AnimationKind::ShowPassingFlash { .. }
        )
    }

    /// Takes its target off the stage when the step ends
    pub fn removes(&self) -> bool {
        matches!(
            self,
            AnimationKind::FadeOut | AnimationKind::ShowPassingFlash { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationKind::Write => "Write",
            AnimationKind::Create => "Create",
            AnimationKind::FadeOut => "FadeOut",
            AnimationKind::ShowPassingFlash { .. } => "ShowPassingFlash",
        }
    }
}

/// Maps linear progress in `[0, 1]` to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateFunc {
    Linear,
    #[default]
    Smooth,
    ThereAndBack,
}

impl RateFunc {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            RateFunc::Linear => t,
            RateFunc::Smooth => smooth(t),
            RateFunc::ThereAndBack => {
                let folded = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
                smooth(folded)
            }
        }
    }
}

/// Logistic S-curve rescaled to hit exactly 0 and 1 at the ends
fn smooth(t: f32) -> f32 {
    const INFLECTION: f32 = 10.0;
    let sigmoid = |x: f32| 1.0 / (1.0 + (-x).exp());
    let error = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

/// One animation applied to one element during a play step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub target: ElementId,
    #[serde(default)]
    pub rate: RateFunc,
}

impl Animation {
    pub fn new(kind: AnimationKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            rate: RateFunc::default(),
        }
    }

    pub fn write(target: ElementId) -> Self {
        Self::new(AnimationKind::Write, target)
    }

    pub fn create(target: ElementId) -> Self {
        Self::new(AnimationKind::Create, target)
    }

    pub fn fade_out(target: ElementId) -> Self {
        Self::new(AnimationKind::FadeOut, target)
    }

    pub fn show_passing_flash(target: ElementId) -> Self {
        Self::new(
            AnimationKind::ShowPassingFlash {
                time_width: FLASH_TIME_WIDTH,
            },
            target,
        )
    }

    pub fn with_rate(mut self, rate: RateFunc) -> Self {
        self.rate = rate;
        self
    }

    /// Run time used when the play call gives none
    pub fn default_run_time(&self, glyph_count: usize) -> f32 {
        match self.kind {
            AnimationKind::Write if glyph_count >= WRITE_LONG_THRESHOLD => 2.0,
            _ => 1.0,
        }
    }

    /// Eased progress at linear step progress `t`
    pub fn progress(&self, t: f32) -> f32 {
        self.rate.apply(t)
    }
}

/// Visible slice `[lower, upper]` of a passing flash at eased progress `p`
pub fn flash_window(p: f32, time_width: f32) -> (f32, f32) {
    let upper = p * (1.0 + time_width);
    let lower = upper - time_width;
    (lower.clamp(0.0, 1.0), upper.clamp(0.0, 1.0))
}
