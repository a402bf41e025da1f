use super::{Block, Doctor, DoctorId, Shift};
use serde::{Deserialize, Serialize};

/// Roster résolu : médecins avec leur registre final et shifts assignés.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub block: Block,
    pub doctors: Vec<Doctor>,
    pub shifts: Vec<Shift>,
}

impl Roster {
    pub fn find_doctor<'a>(&'a self, id: &DoctorId) -> Option<&'a Doctor> {
        self.doctors.iter().find(|d| d.id() == id)
    }

    pub fn find_doctor_by_name<'a>(&'a self, name: &str) -> Option<&'a Doctor> {
        self.doctors.iter().find(|d| d.name() == name)
    }

    /// Shifts tenus par `id`, dans l'ordre du roster.
    pub fn shifts_of<'a>(&'a self, id: &'a DoctorId) -> impl Iterator<Item = &'a Shift> + 'a {
        self.shifts
            .iter()
            .filter(move |s| s.assigned_doctor() == Some(id))
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &Shift> {
        self.shifts.iter().filter(|s| s.assigned_doctor().is_none())
    }
}
