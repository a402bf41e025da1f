use super::{Block, ValidationError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Durée maximale d'un congé demandé.
const MAX_REQUEST_HOURS: u32 = 72;

/// Intervalle semi-ouvert `[start, end)` en heures absolues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start_day: i32, start_time: u8, duration: u32) -> Self {
        let start = Block::hour_offset(start_day, start_time);
        Self {
            start,
            end: start + i64::from(duration),
        }
    }

    /// Des bornes qui se touchent ne chevauchent pas : un repos peut finir
    /// pile au début du shift suivant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOffKind {
    /// Préférence, n'influence que le classement.
    Requested,
    /// Bloquant : conférence, congé imposé, repos post-shift.
    Mandatory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOff {
    start_day: i32,
    start_time: u8,
    duration: u32,
    kind: TimeOffKind,
}

impl TimeOff {
    pub fn requested(
        block: &Block,
        owner: &str,
        start_day: i32,
        start_time: u8,
        duration: u32,
    ) -> Result<Self, ValidationError> {
        let label = format!("requested time-off for {owner}");
        block.check_interval(&label, start_day, start_time, duration)?;
        if duration > MAX_REQUEST_HOURS {
            return Err(ValidationError::RequestTooLong {
                owner: label,
                duration,
                max: MAX_REQUEST_HOURS,
            });
        }
        Ok(Self {
            start_day,
            start_time,
            duration,
            kind: TimeOffKind::Requested,
        })
    }

    pub fn mandatory(
        block: &Block,
        owner: &str,
        start_day: i32,
        start_time: u8,
        duration: u32,
    ) -> Result<Self, ValidationError> {
        let label = format!("mandatory time-off for {owner}");
        block.check_interval(&label, start_day, start_time, duration)?;
        Ok(Self {
            start_day,
            start_time,
            duration,
            kind: TimeOffKind::Mandatory,
        })
    }

    /// Repos qui suit un shift, de même durée. Dérivé par le moteur, il
    /// peut dépasser la fin du bloc.
    pub(crate) fn rest_after(start_day: i32, start_time: u8, duration: u32) -> Self {
        let end = u32::from(start_time) + duration;
        let offset = i32::try_from(end / 24).unwrap_or(0);
        Self {
            start_day: start_day + offset,
            // always < 24
            start_time: (end % 24) as u8,
            duration,
            kind: TimeOffKind::Mandatory,
        }
    }

    pub fn start_day(&self) -> i32 {
        self.start_day
    }

    pub fn start_time(&self) -> u8 {
        self.start_time
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn kind(&self) -> TimeOffKind {
        self.kind
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_day, self.start_time, self.duration)
    }

    /// Ordre chronologique (jour puis heure).
    pub fn chronological(a: &TimeOff, b: &TimeOff) -> Ordering {
        (a.start_day, a.start_time).cmp(&(b.start_day, b.start_time))
    }
}
