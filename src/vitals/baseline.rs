use serde::{Deserialize, Serialize};

use super::{AgeBracket, Baseline, ReferenceRange};

const fn range(low: f64, high: f64) -> ReferenceRange {
    ReferenceRange::from_bounds(low, high)
}

/// Reference baselines for every age bracket.
///
/// Brackets share baselines in four groups: the first week, weeks two to
/// four, months two and three, and six months onwards. The table is built
/// once by the caller and handed around by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTable {
    pub newborn: Baseline,
    pub weeks: Baseline,
    pub early_months: Baseline,
    pub later_months: Baseline,
}

impl BaselineTable {
    pub fn baseline(&self, bracket: AgeBracket) -> &Baseline {
        match bracket {
            AgeBracket::UnderOneWeek => &self.newborn,
            AgeBracket::TwoWeeks | AgeBracket::ThreeWeeks | AgeBracket::FourWeeks => &self.weeks,
            AgeBracket::TwoMonths | AgeBracket::ThreeMonths => &self.early_months,
            AgeBracket::SixMonths | AgeBracket::NineMonths | AgeBracket::OneYear => {
                &self.later_months
            }
        }
    }
}

impl Default for BaselineTable {
    fn default() -> Self {
        BaselineTable {
            newborn: Baseline {
                temperature: range(36.5, 37.5),
                heart_rate: range(100.0, 160.0),
                spo2: range(95.0, 100.0),
                systolic: range(60.0, 80.0),
                diastolic: range(30.0, 50.0),
            },
            weeks: Baseline {
                temperature: range(36.5, 37.5),
                heart_rate: range(110.0, 170.0),
                spo2: range(95.0, 100.0),
                systolic: range(65.0, 85.0),
                diastolic: range(35.0, 55.0),
            },
            early_months: Baseline {
                temperature: range(36.5, 37.5),
                heart_rate: range(100.0, 160.0),
                spo2: range(95.0, 100.0),
                systolic: range(70.0, 95.0),
                diastolic: range(40.0, 60.0),
            },
            later_months: Baseline {
                temperature: range(36.4, 37.4),
                heart_rate: range(90.0, 150.0),
                spo2: range(95.0, 100.0),
                systolic: range(80.0, 100.0),
                diastolic: range(45.0, 65.0),
            },
        }
    }
}
