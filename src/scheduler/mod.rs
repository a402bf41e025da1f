mod assignment;
mod conflicts;
mod feasibility;
mod ranking;
mod types;
mod weeks;

pub use crate::config::Rules;
pub use conflicts::detect_conflicts;
pub use feasibility::check_candidate;
pub use ranking::compare_candidates;
pub use types::{Conflict, ConflictKind, Rejection, SchedError, SearchStats};

use crate::model::{Block, Doctor, Roster, Shift};
use std::collections::HashSet;

/// Scheduler : seul propriétaire des registres pendant la recherche
#[derive(Debug)]
pub struct Scheduler {
    block: Block,
    rules: Rules,
    doctors: Vec<Doctor>,
    shifts: Vec<Shift>,
    /// Registres tels que fournis, pour repartir de zéro à chaque `solve`.
    initial: Vec<Doctor>,
}

impl Scheduler {
    /// Vérifie que tout est lié au même bloc et trie les shifts par début
    /// (tri stable, les égalités gardent l'ordre d'entrée).
    pub fn new(
        block: Block,
        doctors: Vec<Doctor>,
        mut shifts: Vec<Shift>,
        rules: Rules,
    ) -> Result<Self, SchedError> {
        let mut names = HashSet::new();
        for doctor in &doctors {
            if doctor.block() != block {
                return Err(SchedError::BlockMismatch(doctor.name().to_string()));
            }
            if !names.insert(doctor.name()) {
                return Err(SchedError::DuplicateDoctor(doctor.name().to_string()));
            }
        }

        shifts.sort_by_key(|s| (s.start_day(), s.start_time()));
        for shift in &mut shifts {
            shift.assigned_doctor = None;
        }

        Ok(Self {
            block,
            rules,
            initial: doctors.clone(),
            doctors,
            shifts,
        })
    }

    pub fn block(&self) -> Block {
        self.block
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Lance la recherche depuis les registres d'entrée, même après un
    /// premier `solve`. En cas d'erreur, quelle qu'elle soit, registres et
    /// shifts reviennent à leur état initial.
    pub fn solve(&mut self) -> Result<SearchStats, SchedError> {
        self.reset();
        let result =
            assignment::Search::new(self.block, self.rules, &mut self.doctors, &mut self.shifts)
                .run();
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn reset(&mut self) {
        self.doctors.clone_from(&self.initial);
        for shift in &mut self.shifts {
            shift.assigned_doctor = None;
        }
    }

    pub fn into_roster(self) -> Roster {
        Roster {
            block: self.block,
            doctors: self.doctors,
            shifts: self.shifts,
        }
    }
}

/// Construit, résout et renvoie le roster complet.
pub fn solve(
    block: Block,
    doctors: Vec<Doctor>,
    shifts: Vec<Shift>,
    rules: Rules,
) -> Result<(Roster, SearchStats), SchedError> {
    let mut scheduler = Scheduler::new(block, doctors, shifts, rules)?;
    let stats = scheduler.solve()?;
    Ok((scheduler.into_roster(), stats))
}
