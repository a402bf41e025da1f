use super::{feasibility, ranking, weeks, SchedError, SearchStats};
use crate::config::Rules;
use crate::model::{Block, Doctor, LedgerError, Shift};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Complete,
    /// Aucun candidat ne mène à un roster complet.
    Exhausted,
    /// Limite de nœuds atteinte.
    Aborted,
}

/// Recherche en profondeur sur les shifts triés. La pile d'appels sert de
/// journal d'annulation : chaque commit est défait dans l'ordre inverse.
pub(super) struct Search<'a> {
    block: Block,
    rules: Rules,
    doctors: &'a mut [Doctor],
    shifts: &'a mut [Shift],
    /// Index des shifts à pourvoir, dans l'ordre chronologique.
    order: Vec<usize>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub(super) fn new(
        block: Block,
        rules: Rules,
        doctors: &'a mut [Doctor],
        shifts: &'a mut [Shift],
    ) -> Self {
        let order = shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| !(rules.skip_optional_shifts && s.optional()))
            .map(|(idx, _)| idx)
            .collect();
        Self {
            block,
            rules,
            doctors,
            shifts,
            order,
            stats: SearchStats::default(),
        }
    }

    pub(super) fn run(mut self) -> Result<SearchStats, SchedError> {
        match self.descend(0)? {
            Outcome::Complete => {
                info!(
                    shifts = self.order.len(),
                    nodes = self.stats.nodes,
                    backtracks = self.stats.backtracks,
                    "schedule complete"
                );
                Ok(self.stats)
            }
            Outcome::Aborted => {
                info!(
                    nodes = self.stats.nodes,
                    furthest = self.stats.furthest,
                    "node limit reached"
                );
                Err(SchedError::NodeLimitReached {
                    nodes: self.stats.nodes,
                    furthest: self.stats.furthest,
                })
            }
            Outcome::Exhausted => {
                let furthest = self.stats.furthest;
                let shift = self
                    .order
                    .get(furthest)
                    .map(|&idx| self.shifts[idx].label())
                    .unwrap_or_default();
                info!(furthest, total = self.order.len(), %shift, "no feasible schedule");
                Err(SchedError::Infeasible {
                    furthest,
                    total: self.order.len(),
                    shift,
                })
            }
        }
    }

    /// Chaque frame défait son commit et ses semaines avant de rendre
    /// `Exhausted` ou `Aborted` : les registres reviennent à l'état d'entrée.
    fn descend(&mut self, i: usize) -> Result<Outcome, SchedError> {
        let Some(&shift_idx) = self.order.get(i) else {
            return Ok(Outcome::Complete);
        };

        if let Some(limit) = self.rules.node_limit {
            if self.stats.nodes >= limit {
                return Ok(Outcome::Aborted);
            }
        }
        self.stats.nodes += 1;
        self.stats.furthest = self.stats.furthest.max(i);

        let rolled = self.roll_weeks(i);
        let candidates = self.ranked_candidates(shift_idx);
        trace!(i, shift = %self.shifts[shift_idx].label(), candidates = candidates.len(), "frame");

        for doctor_idx in candidates {
            self.commit(doctor_idx, shift_idx);
            let outcome = self.descend(i + 1)?;
            if outcome == Outcome::Complete {
                return Ok(outcome);
            }
            self.undo(doctor_idx, shift_idx)?;
            if outcome == Outcome::Aborted {
                self.unroll_weeks(rolled)?;
                return Ok(outcome);
            }
            self.stats.backtracks += 1;
        }

        self.unroll_weeks(rolled)?;
        Ok(Outcome::Exhausted)
    }

    /// Ouvre une semaine pour chaque dimanche 7h franchi depuis le shift
    /// précédent (ou le début du bloc). Renvoie le nombre de semaines ouvertes.
    fn roll_weeks(&mut self, i: usize) -> usize {
        let previous = match i.checked_sub(1).and_then(|p| self.order.get(p)) {
            Some(&idx) => start_of(&self.shifts[idx]),
            None => (self.block.start_day(), 7),
        };
        let current = start_of(&self.shifts[self.order[i]]);

        let boundaries = weeks::boundaries_between(previous, current);
        for &day in &boundaries {
            debug_assert!(Block::is_week_boundary(day, 7));
            trace!(day, "week rollover");
            for doctor in self.doctors.iter_mut() {
                doctor.reset_week(day);
            }
        }
        boundaries.len()
    }

    fn unroll_weeks(&mut self, count: usize) -> Result<(), LedgerError> {
        for _ in 0..count {
            for doctor in self.doctors.iter_mut() {
                doctor.undo_reset_week()?;
            }
        }
        Ok(())
    }

    fn ranked_candidates(&self, shift_idx: usize) -> Vec<usize> {
        let shift = &self.shifts[shift_idx];
        let mut candidates = feasibility::candidates(&self.doctors[..], shift, &self.rules);
        ranking::rank(&mut candidates, &self.doctors[..], shift);
        if let Some(limit) = self.rules.candidates_per_shift {
            candidates.truncate(limit);
        }
        candidates
    }

    fn commit(&mut self, doctor_idx: usize, shift_idx: usize) {
        let doctor = &mut self.doctors[doctor_idx];
        let shift = &mut self.shifts[shift_idx];
        debug!(shift = %shift.label(), doctor = doctor.name(), "assign");
        doctor.assign(shift);
        shift.assigned_doctor = Some(doctor.id().clone());
    }

    fn undo(&mut self, doctor_idx: usize, shift_idx: usize) -> Result<(), LedgerError> {
        let doctor = &mut self.doctors[doctor_idx];
        let shift = &mut self.shifts[shift_idx];
        let removed = doctor.unassign()?;
        if &removed.shift_id != shift.id() {
            return Err(LedgerError::HistoryMismatch {
                doctor: doctor.name().to_string(),
                expected: shift.id().as_str().to_string(),
                found: removed.shift_id.as_str().to_string(),
            });
        }
        debug!(shift = %shift.label(), doctor = doctor.name(), "backtrack");
        shift.assigned_doctor = None;
        Ok(())
    }
}

fn start_of(shift: &Shift) -> (i32, u8) {
    (shift.start_day(), shift.start_time())
}
