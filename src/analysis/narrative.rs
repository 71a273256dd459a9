use crate::animation::AnimationKind;
use crate::mobject::{ElementId, Role};
use crate::renderer::Timeline;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Comfortable reading range for on-screen narration
pub const MIN_WPM: f32 = 60.0;
pub const MAX_WPM: f32 = 180.0;

#[derive(Debug, Clone, Serialize)]
pub struct NarrationTiming {
    pub index: usize,
    pub text: String,
    pub words: usize,
    /// Seconds from the start of the write to the start of the fade
    pub on_screen: f32,
    pub wpm: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PacingAlert {
    pub narration_index: usize,
    pub wpm: f32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeReport {
    pub items: Vec<NarrationTiming>,
    pub pacing_alerts: Vec<PacingAlert>,
    pub score: u32,
}

pub struct NarrativeAnalyzer;

impl NarrativeAnalyzer {
    pub fn analyze(timeline: &Timeline) -> NarrativeReport {
        let items = Self::narration_timings(timeline);
        let pacing_alerts = Self::analyze_pacing(&items);

        let score = 100u32.saturating_sub((pacing_alerts.len() * 10) as u32);

        NarrativeReport {
            items,
            pacing_alerts,
            score,
        }
    }

    fn narration_timings(timeline: &Timeline) -> Vec<NarrationTiming> {
        let mut items = Vec::new();

        for (id, written_at) in Self::narration_writes(timeline) {
            let Some(text) = timeline.element(id).and_then(|e| e.as_text()) else {
                continue;
            };
            let faded_at = timeline
                .steps()
                .iter()
                .filter(|s| s.start >= written_at)
                .find(|s| {
                    s.animations()
                        .iter()
                        .any(|a| a.target == id && a.kind.removes())
                })
                .map(|s| s.start)
                .unwrap_or_else(|| timeline.total_duration());

            let words = text.content.unicode_words().count();
            let on_screen = faded_at - written_at;
            let wpm = if on_screen > 0.0 {
                words as f32 / (on_screen / 60.0)
            } else {
                0.0
            };

            items.push(NarrationTiming {
                index: items.len(),
                text: text.content.clone(),
                words,
                on_screen,
                wpm,
            });
        }

        items
    }

    /// Narration elements in the order they are written, with the write start time
    fn narration_writes(timeline: &Timeline) -> Vec<(ElementId, f32)> {
        timeline
            .steps()
            .iter()
            .flat_map(|s| s.animations().iter().map(move |a| (a, s.start)))
            .filter(|(a, _)| a.kind == AnimationKind::Write)
            .filter(|(a, _)| timeline.role(a.target) == Some(Role::Narration))
            .map(|(a, start)| (a.target, start))
            .collect()
    }

    fn analyze_pacing(items: &[NarrationTiming]) -> Vec<PacingAlert> {
        let mut alerts = Vec::new();

        for item in items {
            if item.on_screen <= 0.0 {
                continue;
            }

            if item.wpm < MIN_WPM {
                alerts.push(PacingAlert {
                    narration_index: item.index,
                    wpm: item.wpm,
                    message: format!(
                        "Narration {} lingers ({:.0} WPM). Target: {:.0}-{:.0}",
                        item.index + 1,
                        item.wpm,
                        MIN_WPM,
                        MAX_WPM
                    ),
                });
            } else if item.wpm > MAX_WPM {
                alerts.push(PacingAlert {
                    narration_index: item.index,
                    wpm: item.wpm,
                    message: format!(
                        "Narration {} is too fast to read ({:.0} WPM). Target: {:.0}-{:.0}",
                        item.index + 1,
                        item.wpm,
                        MIN_WPM,
                        MAX_WPM
                    ),
                });
            }
        }

        alerts
    }
}
