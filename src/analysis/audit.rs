use crate::animation::AnimationKind;
use crate::mobject::Role;
use crate::renderer::Timeline;
use crate::scene::content::HighlightEvent;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Default)]
pub struct AuditReport {
    pub errors: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a recorded timeline against the stage rules:
/// narration appears in creation order, the caption slot below the code
/// holds at most one element, and nothing transient outlives the scene.
pub struct StageAudit;

impl StageAudit {
    pub fn run(timeline: &Timeline) -> AuditReport {
        let mut report = AuditReport::default();
        Self::check_narration_order(timeline, &mut report);
        Self::check_caption_slot(timeline, &mut report);
        Self::check_leftovers(timeline, &mut report);
        report
    }

    fn check_narration_order(timeline: &Timeline, report: &mut AuditReport) {
        let created: Vec<_> = timeline
            .elements()
            .iter()
            .filter(|e| e.role == Role::Narration)
            .map(|e| e.id)
            .collect();

        let mut written = Vec::new();
        for step in timeline.steps() {
            for anim in step.animations() {
                if anim.kind == AnimationKind::Write
                    && timeline.role(anim.target) == Some(Role::Narration)
                    && !written.contains(&anim.target)
                {
                    written.push(anim.target);
                }
            }
        }

        if written != created {
            report.errors.push(format!(
                "narration written out of order: expected {:?}, got {:?}",
                created, written
            ));
        }
    }

    fn check_caption_slot(timeline: &Timeline, report: &mut AuditReport) {
        for step in timeline.steps() {
            let occupants: Vec<_> = step
                .visible_during()
                .into_iter()
                .filter(|id| timeline.role(*id).is_some_and(Role::is_caption_slot))
                .collect();
            if occupants.len() > 1 {
                report.errors.push(format!(
                    "step {} shows {} captions at once: {:?}",
                    step.index,
                    occupants.len(),
                    occupants
                ));
            }
        }
    }

    fn check_leftovers(timeline: &Timeline, report: &mut AuditReport) {
        let leftovers: Vec<_> = timeline
            .stage()
            .iter()
            .filter(|id| timeline.role(**id).is_some_and(Role::is_transient))
            .collect();
        if !leftovers.is_empty() {
            report.errors.push(format!(
                "transient elements still on stage at the end: {:?}",
                leftovers
            ));
        }
    }

    /// Highlight lines that do not occur verbatim in `code_source`
    pub fn missing_highlight_targets(
        code_source: &str,
        events: &[HighlightEvent],
    ) -> Vec<&'static str> {
        events
            .iter()
            .filter(|e| !code_source.contains(e.line))
            .map(|e| e.line)
            .collect()
    }
}
