use crate::shared::{
    entity::{Entity, ID},
    parse::InvalidEnumValue,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    Day,
    Week,
    Month,
}

impl Display for RepeatFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let freq = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        };
        f.write_str(freq)
    }
}

impl FromStr for RepeatFrequency {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(InvalidEnumValue::new("frequency", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let day = match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        };
        f.write_str(day)
    }
}

impl FromStr for Weekday {
    type Err = InvalidEnumValue;

    fn from_str(day: &str) -> Result<Self, Self::Err> {
        match day.trim().to_lowercase().as_str() {
            "mon" => Ok(Self::Mon),
            "tue" => Ok(Self::Tue),
            "wed" => Ok(Self::Wed),
            "thu" => Ok(Self::Thu),
            "fri" => Ok(Self::Fri),
            "sat" => Ok(Self::Sat),
            "sun" => Ok(Self::Sun),
            _ => Err(InvalidEnumValue::new("weekday", day)),
        }
    }
}

/// Describes a repeating schedule: every `interval` `frequency` units,
/// on `days_of_week` when the frequency is weekly.
///
/// This is metadata only. Nothing computes a next fire time from it, a
/// `Reminder` referencing a descriptor is delivered once.
#[derive(Clone, Debug, PartialEq)]
pub struct RecurrenceDescriptor {
    pub id: ID,
    pub interval: u32,
    pub frequency: RepeatFrequency,
    pub days_of_week: Vec<Weekday>,
}

impl RecurrenceDescriptor {
    /// Returns `None` if the interval is not a positive number
    pub fn new(interval: i64, frequency: RepeatFrequency, days_of_week: Vec<Weekday>) -> Option<Self> {
        if interval < 1 || interval > u32::MAX as i64 {
            return None;
        }
        let mut days_of_week = days_of_week;
        days_of_week.sort();
        days_of_week.dedup();

        Some(Self {
            id: Default::default(),
            interval: interval as u32,
            frequency,
            days_of_week,
        })
    }

    /// The weekdays are only meaningful for weekly schedules
    pub fn weekdays(&self) -> &[Weekday] {
        match self.frequency {
            RepeatFrequency::Week => &self.days_of_week,
            _ => &[],
        }
    }
}

impl Entity for RecurrenceDescriptor {
    fn id(&self) -> &ID {
        &self.id
    }
}
