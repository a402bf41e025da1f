use super::{Block, Eligibility, Interval, LedgerError, Shift, ShiftId, TimeOff, ValidationError};
use crate::config::{
    Location, Seniority, CHIEF_EXPECTED_HOURS, CONFERENCE_HOURS, CONFERENCE_START,
    CONFERENCE_WEEKDAY, STANDARD_BLOCK_DAYS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const HALF_BLOCK_MAX_REQUESTS: usize = 1;
const HALF_BLOCK_MAX_REQUEST_HOURS: u32 = 48;
const FULL_BLOCK_MAX_REQUESTS: usize = 2;
const SHORT_REQUEST_MAX_HOURS: u32 = 12;
const LONG_REQUEST_MAX_HOURS: u32 = 72;

/// Identifiant fort pour Doctor (le nom, unique dans un roster)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plage inclusive `[lower, upper]`, proratisée.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub lower: f64,
    pub upper: f64,
}

impl ExpectedRange {
    fn prorated((lower, upper): (f64, f64), ratio: f64) -> Self {
        Self {
            lower: lower * ratio,
            upper: upper * ratio,
        }
    }
}

/// Données d'entrée d'un médecin, avant validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub name: String,
    pub seniority: Seniority,
    pub chief: bool,
    /// Solde reporté ; négatif = heures déjà travaillées avant le bloc.
    pub carry_hours: i32,
    pub eligibility: Eligibility,
    /// Heures travaillées cette semaine avant le début du bloc.
    pub pre_block_hours: u32,
    pub requested_timeoff: Vec<TimeOff>,
    pub mandatory_timeoff: Vec<TimeOff>,
}

impl DoctorProfile {
    pub fn new<N: Into<String>>(name: N, seniority: Seniority) -> Self {
        Self {
            name: name.into(),
            seniority,
            chief: false,
            carry_hours: 0,
            eligibility: Eligibility::Full,
            pre_block_hours: 0,
            requested_timeoff: Vec::new(),
            mandatory_timeoff: Vec::new(),
        }
    }
}

/// Copie des attributs d'un shift gardée dans l'historique du médecin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedShift {
    pub shift_id: ShiftId,
    pub location: Location,
    pub start_day: i32,
    pub start_time: u8,
    pub duration: u32,
    pub night: bool,
    pub weekend: bool,
}

impl AssignedShift {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_day, self.start_time, self.duration)
    }
}

impl From<&Shift> for AssignedShift {
    fn from(shift: &Shift) -> Self {
        Self {
            shift_id: shift.id().clone(),
            location: shift.location(),
            start_day: shift.start_day(),
            start_time: shift.start_time(),
            duration: shift.duration(),
            night: shift.night(),
            weekend: shift.weekend(),
        }
    }
}

/// Registre d'un médecin : identité, cibles de charge et tout l'état
/// nécessaire pour défaire une assignation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    id: DoctorId,
    seniority: Seniority,
    chief: bool,
    eligibility: Eligibility,
    block: Block,
    carry_hours: i32,
    pre_block_hours: u32,
    expected_hours: f64,
    expected_nights: ExpectedRange,
    expected_weekends: ExpectedRange,
    requested_timeoff: Vec<TimeOff>,
    /// Pile : la base (conférences, congés imposés) n'est jamais dépilée,
    /// chaque assignation empile un repos.
    mandatory_timeoff: Vec<TimeOff>,
    base_mandatory: usize,
    /// Une entrée par semaine, la dernière est la semaine courante.
    weekly_hours: Vec<u32>,
    actual_hours: i64,
    actual_nights: u32,
    actual_weekends: u32,
    actual_shifts: u32,
    consecutive_night_shifts: u32,
    consecutive_weekend_shifts: u32,
    location_hours: BTreeMap<Location, u32>,
    history: Vec<AssignedShift>,
}

impl Doctor {
    pub fn new(block: Block, profile: DoctorProfile) -> Result<Self, ValidationError> {
        let DoctorProfile {
            name,
            seniority,
            chief,
            carry_hours,
            eligibility,
            pre_block_hours,
            requested_timeoff,
            mut mandatory_timeoff,
        } = profile;

        let requested_timeoff = validate_requests(&block, &name, eligibility, requested_timeoff)?;

        if i64::from(carry_hours) > -i64::from(pre_block_hours) {
            return Err(ValidationError::CarryBelowPreBlock {
                doctor: name,
                carry: carry_hours,
                pre_block: pre_block_hours,
            });
        }

        let working_days = block.working_days(eligibility);
        let ratio = f64::from(working_days) / f64::from(STANDARD_BLOCK_DAYS);
        let base_hours = if chief {
            CHIEF_EXPECTED_HOURS
        } else {
            seniority.standard_hours()
        };

        let (first, last) = block.window(eligibility);
        if seniority != Seniority::OffService {
            for day in first..=last {
                if day.rem_euclid(7) == CONFERENCE_WEEKDAY {
                    mandatory_timeoff.push(TimeOff::mandatory(
                        &block,
                        &name,
                        day,
                        CONFERENCE_START,
                        CONFERENCE_HOURS,
                    )?);
                }
            }
        }

        // Les heures d'avant-bloc d'un médecin de seconde moitié comptent
        // pour la semaine du jour 15, pas pour la première.
        let first_week = match eligibility {
            Eligibility::SecondHalf => 0,
            Eligibility::Full | Eligibility::FirstHalf => pre_block_hours,
        };

        Ok(Self {
            id: DoctorId::new(&name),
            seniority,
            chief,
            eligibility,
            block,
            carry_hours,
            pre_block_hours,
            expected_hours: base_hours * ratio,
            expected_nights: ExpectedRange::prorated(seniority.standard_nights(), ratio),
            expected_weekends: ExpectedRange::prorated(seniority.standard_weekends(), ratio),
            requested_timeoff,
            base_mandatory: mandatory_timeoff.len(),
            mandatory_timeoff,
            weekly_hours: vec![first_week],
            actual_hours: -i64::from(carry_hours),
            actual_nights: 0,
            actual_weekends: 0,
            actual_shifts: 0,
            consecutive_night_shifts: 0,
            consecutive_weekend_shifts: 0,
            location_hours: Location::ALL.into_iter().map(|loc| (loc, 0)).collect(),
            history: Vec::new(),
        })
    }

    pub fn id(&self) -> &DoctorId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn seniority(&self) -> Seniority {
        self.seniority
    }

    pub fn chief(&self) -> bool {
        self.chief
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    pub fn block(&self) -> Block {
        self.block
    }

    pub fn carry_hours(&self) -> i32 {
        self.carry_hours
    }

    pub fn pre_block_hours(&self) -> u32 {
        self.pre_block_hours
    }

    pub fn expected_hours(&self) -> f64 {
        self.expected_hours
    }

    pub fn expected_nights(&self) -> ExpectedRange {
        self.expected_nights
    }

    pub fn expected_weekends(&self) -> ExpectedRange {
        self.expected_weekends
    }

    pub fn requested_timeoff(&self) -> &[TimeOff] {
        &self.requested_timeoff
    }

    pub fn mandatory_timeoff(&self) -> &[TimeOff] {
        &self.mandatory_timeoff
    }

    pub fn weekly_hours(&self) -> &[u32] {
        &self.weekly_hours
    }

    pub fn current_week_hours(&self) -> u32 {
        self.weekly_hours.last().copied().unwrap_or(0)
    }

    pub fn actual_hours(&self) -> i64 {
        self.actual_hours
    }

    pub fn actual_nights(&self) -> u32 {
        self.actual_nights
    }

    pub fn actual_weekends(&self) -> u32 {
        self.actual_weekends
    }

    pub fn actual_shifts(&self) -> u32 {
        self.actual_shifts
    }

    pub fn consecutive_night_shifts(&self) -> u32 {
        self.consecutive_night_shifts
    }

    pub fn consecutive_weekend_shifts(&self) -> u32 {
        self.consecutive_weekend_shifts
    }

    pub fn location_hours(&self) -> &BTreeMap<Location, u32> {
        &self.location_hours
    }

    pub fn hours_at(&self, location: Location) -> u32 {
        self.location_hours.get(&location).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[AssignedShift] {
        &self.history
    }

    pub fn working_days(&self) -> u32 {
        self.block.working_days(self.eligibility)
    }

    pub fn working_on(&self, day: i32) -> bool {
        let (first, last) = self.block.window(self.eligibility);
        (first..=last).contains(&day)
    }

    pub fn hours_needed(&self) -> f64 {
        self.expected_hours - self.actual_hours as f64
    }

    pub fn nights_needed(&self) -> f64 {
        self.expected_nights.upper - f64::from(self.actual_nights)
    }

    pub fn weekends_needed(&self) -> f64 {
        self.expected_weekends.upper - f64::from(self.actual_weekends)
    }

    /// Le médecin a-t-il demandé un congé qui chevauche ce shift ?
    pub fn requests_time_off_during(&self, shift: &Shift) -> bool {
        let interval = shift.interval();
        self.requested_timeoff
            .iter()
            .any(|t| t.interval().overlaps(&interval))
    }

    pub fn blocked_during(&self, shift: &Shift) -> bool {
        let interval = shift.interval();
        self.mandatory_timeoff
            .iter()
            .any(|t| t.interval().overlaps(&interval))
    }

    /// Chevauchement avec un shift déjà assigné.
    pub fn on_duty_during(&self, shift: &Shift) -> bool {
        let interval = shift.interval();
        self.history
            .iter()
            .rev()
            .any(|s| s.interval().overlaps(&interval))
    }

    pub fn can_extend_nights(&self, max_consecutive: u32) -> bool {
        self.consecutive_night_shifts < max_consecutive
            && f64::from(self.actual_nights) < self.expected_nights.upper
    }

    pub fn can_extend_weekends(&self, max_consecutive: u32) -> bool {
        self.consecutive_weekend_shifts < max_consecutive
            && f64::from(self.actual_weekends) < self.expected_weekends.upper
    }

    /// Ouvre une nouvelle semaine au dimanche `boundary_day`.
    pub fn reset_week(&mut self, boundary_day: i32) {
        let seed = if self.eligibility == Eligibility::SecondHalf
            && Block::week_contains_second_half(boundary_day)
        {
            self.pre_block_hours
        } else {
            0
        };
        self.weekly_hours.push(seed);
    }

    pub fn undo_reset_week(&mut self) -> Result<(), LedgerError> {
        if self.weekly_hours.len() <= 1 {
            return Err(LedgerError::EmptyWeekLedger {
                doctor: self.name().to_string(),
            });
        }
        self.weekly_hours.pop();
        Ok(())
    }

    pub fn assign(&mut self, shift: &Shift) {
        let hours = shift.duration();
        self.actual_shifts += 1;
        self.actual_hours += i64::from(hours);
        if let Some(week) = self.weekly_hours.last_mut() {
            *week += hours;
        }
        *self.location_hours.entry(shift.location()).or_insert(0) += hours;

        if shift.night() {
            self.actual_nights += 1;
            self.consecutive_night_shifts += 1;
        } else {
            self.consecutive_night_shifts = 0;
        }
        if shift.weekend() {
            self.actual_weekends += 1;
            self.consecutive_weekend_shifts += 1;
        } else {
            self.consecutive_weekend_shifts = 0;
        }

        self.mandatory_timeoff.push(TimeOff::rest_after(
            shift.start_day(),
            shift.start_time(),
            hours,
        ));
        self.history.push(AssignedShift::from(shift));
    }

    /// Défait la dernière assignation et rend le shift retiré. Rien n'est
    /// modifié si l'une des piles ou l'un des compteurs ne peut pas l'être.
    pub fn unassign(&mut self) -> Result<AssignedShift, LedgerError> {
        if self.mandatory_timeoff.len() <= self.base_mandatory {
            return Err(LedgerError::EmptyRestStack {
                doctor: self.name().to_string(),
            });
        }
        let Some(last) = self.history.last() else {
            return Err(LedgerError::EmptyHistory {
                doctor: self.name().to_string(),
            });
        };
        let duration = last.duration;
        let location = last.location;
        let week = self
            .weekly_hours
            .last()
            .and_then(|h| h.checked_sub(duration))
            .ok_or_else(|| self.underflow("weekly hours"))?;
        let at_location = self
            .location_hours
            .get(&location)
            .and_then(|h| h.checked_sub(duration))
            .ok_or_else(|| self.underflow("location hours"))?;
        let nights = if last.night {
            self.actual_nights
                .checked_sub(1)
                .ok_or_else(|| self.underflow("nights"))?
        } else {
            self.actual_nights
        };
        let weekends = if last.weekend {
            self.actual_weekends
                .checked_sub(1)
                .ok_or_else(|| self.underflow("weekends"))?
        } else {
            self.actual_weekends
        };
        let shifts = self
            .actual_shifts
            .checked_sub(1)
            .ok_or_else(|| self.underflow("shifts"))?;

        let Some(shift) = self.history.pop() else {
            return Err(LedgerError::EmptyHistory {
                doctor: self.name().to_string(),
            });
        };
        self.mandatory_timeoff.pop();
        self.actual_shifts = shifts;
        self.actual_hours -= i64::from(duration);
        self.actual_nights = nights;
        self.actual_weekends = weekends;
        if let Some(hours) = self.weekly_hours.last_mut() {
            *hours = week;
        }
        self.location_hours.insert(location, at_location);

        // Retirer un shift de jour ne dit rien de la série qui le précède :
        // il faut la recompter.
        self.consecutive_night_shifts = if shift.night {
            self.consecutive_night_shifts.saturating_sub(1)
        } else {
            self.recompute_consecutive_nights()
        };
        self.consecutive_weekend_shifts = if shift.weekend {
            self.consecutive_weekend_shifts.saturating_sub(1)
        } else {
            self.recompute_consecutive_weekends()
        };

        Ok(shift)
    }

    fn underflow(&self, ledger: &'static str) -> LedgerError {
        LedgerError::Underflow {
            doctor: self.name().to_string(),
            ledger,
        }
    }

    /// Longueur de la série de nuits en fin d'historique.
    pub fn recompute_consecutive_nights(&self) -> u32 {
        trailing_run(&self.history, |s| s.night)
    }

    pub fn recompute_consecutive_weekends(&self) -> u32 {
        trailing_run(&self.history, |s| s.weekend)
    }
}

fn trailing_run(history: &[AssignedShift], matches: impl Fn(&AssignedShift) -> bool) -> u32 {
    let run = history.iter().rev().take_while(|s| matches(s)).count();
    u32::try_from(run).unwrap_or(u32::MAX)
}

fn validate_requests(
    block: &Block,
    name: &str,
    eligibility: Eligibility,
    mut requested: Vec<TimeOff>,
) -> Result<Vec<TimeOff>, ValidationError> {
    let max = if eligibility.is_half() {
        HALF_BLOCK_MAX_REQUESTS
    } else {
        FULL_BLOCK_MAX_REQUESTS
    };
    if requested.len() > max {
        return Err(ValidationError::TooManyRequests {
            doctor: name.to_string(),
            count: requested.len(),
            max,
        });
    }
    requested.sort_by(TimeOff::chronological);

    if eligibility.is_half() {
        let (first, last) = block.window(eligibility);
        for request in &requested {
            if request.duration() > HALF_BLOCK_MAX_REQUEST_HOURS {
                return Err(ValidationError::RequestTooLong {
                    owner: name.to_string(),
                    duration: request.duration(),
                    max: HALF_BLOCK_MAX_REQUEST_HOURS,
                });
            }
            if !(first..=last).contains(&request.start_day()) {
                return Err(ValidationError::RequestOutsideWindow {
                    doctor: name.to_string(),
                    day: request.start_day(),
                    first,
                    last,
                });
            }
        }
    } else if let [a, b] = requested.as_slice() {
        let shorter = a.duration().min(b.duration());
        let longer = a.duration().max(b.duration());
        if shorter > SHORT_REQUEST_MAX_HOURS {
            return Err(ValidationError::RequestTooLong {
                owner: name.to_string(),
                duration: shorter,
                max: SHORT_REQUEST_MAX_HOURS,
            });
        }
        if longer > LONG_REQUEST_MAX_HOURS {
            return Err(ValidationError::RequestTooLong {
                owner: name.to_string(),
                duration: longer,
                max: LONG_REQUEST_MAX_HOURS,
            });
        }
    }
    Ok(requested)
}
