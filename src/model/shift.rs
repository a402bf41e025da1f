use super::{Block, DoctorId, Interval, ValidationError};
use crate::config::{Location, Seniority};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SHIFT_LENGTHS: [u32; 4] = [8, 9, 10, 12];

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Nuit : début à 19h ou après, ou avant 7h.
pub fn is_night(start_time: u8) -> bool {
    start_time >= 19 || start_time < 7
}

/// Week-end : début entre samedi 7h et lundi 6h59.
pub fn is_weekend(start_day: i32, start_time: u8) -> bool {
    match start_day.rem_euclid(7) {
        6 => start_time >= 7,
        0 => true,
        1 => start_time < 7,
        _ => false,
    }
}

/// Créneau de garde à pourvoir
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    id: ShiftId,
    location: Location,
    start_day: i32,
    start_time: u8,
    duration: u32,
    /// Niveaux acceptés, du plus au moins préféré.
    position_preferences: Vec<Seniority>,
    optional: bool,
    night: bool,
    weekend: bool,
    pub(crate) assigned_doctor: Option<DoctorId>,
}

impl Shift {
    pub fn new(
        block: &Block,
        location: Location,
        start_day: i32,
        start_time: u8,
        duration: u32,
        position_preferences: Vec<Seniority>,
        optional: bool,
    ) -> Result<Self, ValidationError> {
        let owner = format!("shift {location} day {start_day}");
        block.check_interval(&owner, start_day, start_time, duration)?;
        if !SHIFT_LENGTHS.contains(&duration) {
            return Err(ValidationError::ShiftDuration { owner, duration });
        }
        if position_preferences.is_empty() {
            return Err(ValidationError::EmptyPreferences { owner });
        }
        Ok(Self {
            id: ShiftId::random(),
            location,
            start_day,
            start_time,
            duration,
            position_preferences,
            optional,
            night: is_night(start_time),
            weekend: is_weekend(start_day, start_time),
            assigned_doctor: None,
        })
    }

    pub fn id(&self) -> &ShiftId {
        &self.id
    }

    pub fn location(&self) -> Location {
        self.location
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

    pub fn position_preferences(&self) -> &[Seniority] {
        &self.position_preferences
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn night(&self) -> bool {
        self.night
    }

    pub fn weekend(&self) -> bool {
        self.weekend
    }

    pub fn assigned_doctor(&self) -> Option<&DoctorId> {
        self.assigned_doctor.as_ref()
    }

    /// Fixe le médecin sans toucher à son registre (roster chargé ou
    /// édité à la main).
    pub fn set_assigned_doctor(&mut self, doctor: Option<DoctorId>) {
        self.assigned_doctor = doctor;
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start_day, self.start_time, self.duration)
    }

    /// Rang de `seniority` dans les préférences, `None` si refusé.
    pub fn preference_rank(&self, seniority: Seniority) -> Option<usize> {
        self.position_preferences.iter().position(|s| *s == seniority)
    }

    pub fn accepts(&self, seniority: Seniority) -> bool {
        self.preference_rank(seniority).is_some()
    }

    /// Libellé court, ex. `Resus day 3 19h+12`.
    pub fn label(&self) -> String {
        format!(
            "{} day {} {}h+{}",
            self.location, self.start_day, self.start_time, self.duration
        )
    }
}
