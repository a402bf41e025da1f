mod block;
mod doctor;
mod roster;
mod shift;
mod timeoff;

pub use block::{Block, Eligibility, SECOND_HALF_START_DAY};
pub use doctor::{AssignedShift, Doctor, DoctorId, DoctorProfile, ExpectedRange};
pub use roster::Roster;
pub use shift::{is_night, is_weekend, Shift, ShiftId};
pub use timeoff::{Interval, TimeOff, TimeOffKind};

use thiserror::Error;

/// Erreur de validation à la construction (rien n'est construit).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("block start is {0}, but must begin within 7 days of day 1")]
    BlockStart(i32),
    #[error("block end is {0}, but must end within 7 days of day 28")]
    BlockEnd(i32),
    #[error("block start {start} must be before block end {end}")]
    BlockOrder { start: i32, end: i32 },
    #[error("{owner}: day {day} is outside block [{block_start}, {block_end}]")]
    DayOutsideBlock {
        owner: String,
        day: i32,
        block_start: i32,
        block_end: i32,
    },
    #[error("{owner}: start time {time} must be between 0 and 23")]
    StartTime { owner: String, time: u8 },
    #[error("{owner}: start time {time} is before 7am on the first day of the block")]
    BeforeBlockOpens { owner: String, time: u8 },
    #[error("{owner}: ends on day {end_day} at {end_time}h, past the end of the block")]
    EndsAfterBlock {
        owner: String,
        end_day: i32,
        end_time: u32,
    },
    #[error("{owner}: requested {duration} hours off, at most {max} allowed")]
    RequestTooLong {
        owner: String,
        duration: u32,
        max: u32,
    },
    #[error("{owner}: duration {duration} must be one of 8, 9, 10 or 12 hours")]
    ShiftDuration { owner: String, duration: u32 },
    #[error("{owner}: position preferences cannot be empty")]
    EmptyPreferences { owner: String },
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("unknown seniority code: {0}")]
    UnknownSeniority(i64),
    #[error("invalid half block value {0:?}, expected '1', '2' or 'Both'")]
    UnknownEligibility(String),
    #[error("{doctor} requested {count} times-off, at most {max} allowed")]
    TooManyRequests {
        doctor: String,
        count: usize,
        max: usize,
    },
    #[error("{doctor} requested day {day} off, but only works days {first} to {last}")]
    RequestOutsideWindow {
        doctor: String,
        day: i32,
        first: i32,
        last: i32,
    },
    #[error("{doctor} worked {pre_block} hours before the block, carried hours {carry} must be at most -{pre_block}")]
    CarryBelowPreBlock {
        doctor: String,
        carry: i32,
        pre_block: u32,
    },
}

/// Incohérence commit/undo détectée en défaisant le registre d'un médecin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{doctor}: no assigned shift left to remove")]
    EmptyHistory { doctor: String },
    #[error("{doctor}: no rest period left to remove")]
    EmptyRestStack { doctor: String },
    #[error("{doctor}: weekly hour ledger has no rolled-over week to remove")]
    EmptyWeekLedger { doctor: String },
    #[error("{doctor}: removing the last shift would take {ledger} below zero")]
    Underflow { doctor: String, ledger: &'static str },
    #[error("{doctor}: expected to remove shift {expected}, found {found}")]
    HistoryMismatch {
        doctor: String,
        expected: String,
        found: String,
    },
}
