use crate::model::{DoctorId, LedgerError, ShiftId, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compteurs de la recherche
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub backtracks: u64,
    /// Index (dans l'ordre chronologique) du shift le plus loin atteint.
    pub furthest: usize,
}

/// Raison pour laquelle un médecin n'est pas candidat à un shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NotWorking,
    SeniorityNotAccepted,
    MandatoryTimeOff,
    AlreadyOnDuty,
    WeeklyCap,
    NightQuota,
    NightString,
    WeekendQuota,
    WeekendString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Deux shifts du même médecin se chevauchent.
    Overlap,
    /// Un shift tombe dans le repos qui suit un autre.
    RestViolation,
    WeeklyCap { week_start_day: i32, hours: u32 },
    Unassigned,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub doctor: Option<DoctorId>,
    pub shift_a: ShiftId,
    pub shift_b: Option<ShiftId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("no feasible roster: stuck at shift {furthest}/{total} ({shift})")]
    Infeasible {
        furthest: usize,
        total: usize,
        shift: String,
    },
    #[error("search stopped after {nodes} nodes, furthest shift reached {furthest}")]
    NodeLimitReached { nodes: u64, furthest: usize },
    #[error("ledger invariant violated: {0}")]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("doctor {0} was built for a different block")]
    BlockMismatch(String),
    #[error("duplicate doctor name: {0}")]
    DuplicateDoctor(String),
}
