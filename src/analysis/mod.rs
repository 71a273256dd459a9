pub mod audit;
pub mod narrative;

pub use audit::{AuditReport, StageAudit};
pub use narrative::{NarrativeAnalyzer, NarrativeReport};
