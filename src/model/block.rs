use super::ValidationError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Premier jour de la seconde moitié du bloc.
pub const SECOND_HALF_START_DAY: i32 = 15;
const FIRST_HALF_END_DAY: i32 = SECOND_HALF_START_DAY - 1;
/// Les journées du bloc commencent à 7h.
const DAY_START_HOUR: i64 = 7;
const HOURS_PER_WEEK: i64 = 7 * 24;

/// Horizon de planification, intervalle de jours inclusif.
/// Le jour 1 est un lundi, `day % 7 == 0` un dimanche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    start_day: i32,
    end_day: i32,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            start_day: 1,
            end_day: 28,
        }
    }
}

impl Block {
    pub fn new(start_day: i32, end_day: i32) -> Result<Self, ValidationError> {
        if !(1 - 7..=1 + 7).contains(&start_day) {
            return Err(ValidationError::BlockStart(start_day));
        }
        if !(28 - 7..=28 + 7).contains(&end_day) {
            return Err(ValidationError::BlockEnd(end_day));
        }
        if start_day >= end_day {
            return Err(ValidationError::BlockOrder {
                start: start_day,
                end: end_day,
            });
        }
        Ok(Self { start_day, end_day })
    }

    pub fn start_day(&self) -> i32 {
        self.start_day
    }

    pub fn end_day(&self) -> i32 {
        self.end_day
    }

    pub fn contains(&self, day: i32) -> bool {
        (self.start_day..=self.end_day).contains(&day)
    }

    /// Jours (inclusifs) travaillés selon l'éligibilité.
    pub fn window(&self, eligibility: Eligibility) -> (i32, i32) {
        match eligibility {
            Eligibility::Full => (self.start_day, self.end_day),
            Eligibility::FirstHalf => (self.start_day, FIRST_HALF_END_DAY),
            Eligibility::SecondHalf => (SECOND_HALF_START_DAY, self.end_day),
        }
    }

    pub fn working_days(&self, eligibility: Eligibility) -> u32 {
        let (first, last) = self.window(eligibility);
        u32::try_from(last - first + 1).unwrap_or(0)
    }

    /// Dimanche 7h : remise à zéro du plafond hebdomadaire.
    pub fn is_week_boundary(day: i32, time: u8) -> bool {
        day.rem_euclid(7) == 0 && time == 7
    }

    pub fn overlaps_second_block(day: i32) -> bool {
        day == SECOND_HALF_START_DAY
    }

    /// La semaine commençant le dimanche `boundary_day` contient-elle le
    /// premier jour de la seconde moitié ?
    pub fn week_contains_second_half(boundary_day: i32) -> bool {
        (boundary_day..boundary_day + 7).any(Self::overlaps_second_block)
    }

    pub fn weekday(day: i32) -> Weekday {
        match day.rem_euclid(7) {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }

    /// Heure absolue de `day` à `time`.
    pub fn hour_offset(day: i32, time: u8) -> i64 {
        i64::from(day) * 24 + i64::from(time)
    }

    /// Index de la semaine (dimanche 7h) contenant cet instant.
    pub fn week_index(day: i32, time: u8) -> i64 {
        (Self::hour_offset(day, time) - DAY_START_HOUR).div_euclid(HOURS_PER_WEEK)
    }

    /// Dimanche où commence la semaine `index`.
    pub fn week_start_day(index: i64) -> i32 {
        i32::try_from(index * 7).unwrap_or(i32::MAX)
    }

    /// Bornes jour/heure/durée communes aux shifts et congés.
    pub(crate) fn check_interval(
        &self,
        owner: &str,
        start_day: i32,
        start_time: u8,
        duration: u32,
    ) -> Result<(), ValidationError> {
        if !self.contains(start_day) {
            return Err(ValidationError::DayOutsideBlock {
                owner: owner.to_string(),
                day: start_day,
                block_start: self.start_day,
                block_end: self.end_day,
            });
        }
        if start_time > 23 {
            return Err(ValidationError::StartTime {
                owner: owner.to_string(),
                time: start_time,
            });
        }
        if start_day == self.start_day && i64::from(start_time) < DAY_START_HOUR {
            return Err(ValidationError::BeforeBlockOpens {
                owner: owner.to_string(),
                time: start_time,
            });
        }

        let end = u32::from(start_time) + duration;
        let end_day = start_day.saturating_add(i32::try_from(end / 24).unwrap_or(i32::MAX));
        let end_time = end % 24;
        let past_last_morning = end_day == self.end_day + 1 && i64::from(end_time) > DAY_START_HOUR;
        if end_day > self.end_day + 1 || past_last_morning {
            return Err(ValidationError::EndsAfterBlock {
                owner: owner.to_string(),
                end_day,
                end_time,
            });
        }
        Ok(())
    }
}

/// Portion du bloc pendant laquelle un médecin est en service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    Full,
    FirstHalf,
    SecondHalf,
}

impl Eligibility {
    pub fn is_half(self) -> bool {
        !matches!(self, Self::Full)
    }
}

impl FromStr for Eligibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "full" => Ok(Self::Full),
            "1" => Ok(Self::FirstHalf),
            "2" => Ok(Self::SecondHalf),
            _ => Err(ValidationError::UnknownEligibility(s.to_string())),
        }
    }
}
