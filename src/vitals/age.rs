use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete age groups used to pick reference ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    UnderOneWeek,
    TwoWeeks,
    ThreeWeeks,
    FourWeeks,
    TwoMonths,
    ThreeMonths,
    SixMonths,
    NineMonths,
    OneYear,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 9] = [
        AgeBracket::UnderOneWeek,
        AgeBracket::TwoWeeks,
        AgeBracket::ThreeWeeks,
        AgeBracket::FourWeeks,
        AgeBracket::TwoMonths,
        AgeBracket::ThreeMonths,
        AgeBracket::SixMonths,
        AgeBracket::NineMonths,
        AgeBracket::OneYear,
    ];

    /// Inclusive upper bounds in elapsed days; anything above the last is `OneYear`
    const UPPER_BOUNDS: [(i64, AgeBracket); 8] = [
        (6, AgeBracket::UnderOneWeek),
        (13, AgeBracket::TwoWeeks),
        (20, AgeBracket::ThreeWeeks),
        (27, AgeBracket::FourWeeks),
        (60, AgeBracket::TwoMonths),
        (90, AgeBracket::ThreeMonths),
        (180, AgeBracket::SixMonths),
        (270, AgeBracket::NineMonths),
    ];

    /// Map elapsed whole days since birth to a bracket. Negative counts are
    /// treated as zero.
    pub fn from_elapsed_days(days: i64) -> Self {
        let days = days.max(0);
        Self::UPPER_BOUNDS
            .iter()
            .find(|(upper, _)| days <= *upper)
            .map(|(_, bracket)| *bracket)
            .unwrap_or(AgeBracket::OneYear)
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeBracket::UnderOneWeek => "under 1 week",
            AgeBracket::TwoWeeks => "2 weeks",
            AgeBracket::ThreeWeeks => "3 weeks",
            AgeBracket::FourWeeks => "4 weeks",
            AgeBracket::TwoMonths => "2 months",
            AgeBracket::ThreeMonths => "3 months",
            AgeBracket::SixMonths => "6 months",
            AgeBracket::NineMonths => "9 months",
            AgeBracket::OneYear => "1 year",
        };
        f.write_str(label)
    }
}

/// Whole calendar days between the start of the birth day and the start of
/// the `now` day, both taken in `now`'s time zone. Floored at zero.
pub fn elapsed_days<Tz: TimeZone>(birth: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    let birth_day = birth.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();
    (today - birth_day).num_days().max(0)
}

/// Resolves the subject's age bracket from a fixed birth timestamp
#[derive(Debug, Clone)]
pub struct AgeResolver {
    birth: DateTime<Local>,
}

impl AgeResolver {
    pub fn new<Tz: TimeZone>(birth: DateTime<Tz>) -> Self {
        AgeResolver {
            birth: birth.with_timezone(&Local),
        }
    }

    /// Bracket as of the wall clock
    pub fn resolve(&self) -> AgeBracket {
        self.resolve_at(&Local::now())
    }

    /// Bracket as of an explicit `now`
    pub fn resolve_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> AgeBracket {
        let birth = self.birth.with_timezone(&now.timezone());
        AgeBracket::from_elapsed_days(elapsed_days(&birth, now))
    }
}
