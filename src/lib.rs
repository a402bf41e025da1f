#![forbid(unsafe_code)]
//! Residency roster — moteur d'affectation des résidents aux shifts
//! d'urgence sur un bloc de planification.
//!
//! - Recherche en profondeur avec retour arrière sur les shifts triés.
//! - Contraintes dures : disponibilité, ancienneté, repos, 60h/semaine,
//!   séries de nuits et de week-ends.
//! - Classement lexicographique des candidats (congés demandés, séries,
//!   quotas, préférences de poste, heures, diversité des lieux).
//! - Import CSV, export JSON/CSV, rapport texte.

pub mod config;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use config::{Location, Rules, Seniority};
pub use model::{
    Block, Doctor, DoctorId, DoctorProfile, Eligibility, Roster, Shift, ShiftId, TimeOff,
};
pub use report::{summarize, DoctorSummary, RosterRenderer, TextReport};
pub use scheduler::{
    detect_conflicts, solve, Conflict, ConflictKind, Rejection, SchedError, Scheduler,
    SearchStats,
};
pub use storage::{JsonStorage, Storage};
