//! Capture labels, the ordered set driving transform and partition
//! semantics (spec.md §3/§GLOSSARY).

use serde::{Deserialize, Serialize};

/// Ordered capture label. Ordering matters: it is the priority used to
/// decide, e.g., which captured element is "the" Primary when several
/// expression-graph vertices happen to carry the same label (never allowed
/// within a single well-formed expression graph, but used by fixtures and
/// diagnostics to render a stable order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CaptureLabel {
    Primary,
    Secondary,
    Include,
    Exclude,
    Ignore,
}

impl CaptureLabel {
    pub const ALL: [CaptureLabel; 5] = [
        CaptureLabel::Primary,
        CaptureLabel::Secondary,
        CaptureLabel::Include,
        CaptureLabel::Exclude,
        CaptureLabel::Ignore,
    ];
}
