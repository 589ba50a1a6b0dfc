use super::{Baseline, OverallStatus, Reading, ReferenceRange, Vital, VitalStatus};

/// Floor applied to the range width so degenerate ranges still get a band
pub const WIDTH_EPSILON: f64 = 1e-4;

/// Fraction of the range width treated as the warning band on each edge
pub const WARNING_BAND_FRACTION: f64 = 0.10;

/// Classify a single value against its reference range.
///
/// Out-of-range values are `Danger`. In-range values within 10% of the
/// width from either edge are `Warning`. Non-finite values are `Danger`.
pub fn classify(range: &ReferenceRange, value: f64) -> VitalStatus {
    if !value.is_finite() {
        return VitalStatus::Danger;
    }

    if !range.contains(value) {
        return VitalStatus::Danger;
    }

    let (low, high) = (range.low(), range.high());
    let width = (high - low).max(WIDTH_EPSILON);
    let band = width * WARNING_BAND_FRACTION;
    if value < low + band || value > high - band {
        return VitalStatus::Warning;
    }

    VitalStatus::Normal
}

/// Worst status in the collection; `Normal` when empty
pub fn aggregate<I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = VitalStatus>,
{
    statuses
        .into_iter()
        .max()
        .unwrap_or(VitalStatus::Normal)
}

/// Classifies whole readings against one baseline
#[derive(Debug, Clone, Copy)]
pub struct RangeClassifier<'a> {
    baseline: &'a Baseline,
}

impl<'a> RangeClassifier<'a> {
    pub fn new(baseline: &'a Baseline) -> Self {
        RangeClassifier { baseline }
    }

    pub fn status(&self, reading: &Reading, vital: Vital) -> VitalStatus {
        classify(self.baseline.range(vital), reading.get(vital))
    }

    /// Per-vital statuses in `Vital::ALL` order
    pub fn statuses(&self, reading: &Reading) -> [(Vital, VitalStatus); 5] {
        Vital::ALL.map(|vital| (vital, self.status(reading, vital)))
    }

    pub fn overall(&self, reading: &Reading) -> OverallStatus {
        aggregate(Vital::ALL.map(|vital| self.status(reading, vital)))
    }
}
