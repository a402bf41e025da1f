use super::{Rejection, Rules};
use crate::model::{Doctor, Shift};

/// Contraintes dures : `Ok` si `doctor` peut prendre `shift`.
pub fn check_candidate(doctor: &Doctor, shift: &Shift, rules: &Rules) -> Result<(), Rejection> {
    if !doctor.working_on(shift.start_day()) {
        return Err(Rejection::NotWorking);
    }
    if !shift.accepts(doctor.seniority()) {
        return Err(Rejection::SeniorityNotAccepted);
    }
    if doctor.blocked_during(shift) {
        return Err(Rejection::MandatoryTimeOff);
    }
    if doctor.on_duty_during(shift) {
        return Err(Rejection::AlreadyOnDuty);
    }
    if doctor.current_week_hours() + shift.duration() > rules.weekly_hour_cap {
        return Err(Rejection::WeeklyCap);
    }
    if shift.night() && !doctor.can_extend_nights(rules.max_consecutive_nights) {
        return Err(if doctor.consecutive_night_shifts() >= rules.max_consecutive_nights {
            Rejection::NightString
        } else {
            Rejection::NightQuota
        });
    }
    if shift.weekend() && !doctor.can_extend_weekends(rules.max_consecutive_weekends) {
        return Err(
            if doctor.consecutive_weekend_shifts() >= rules.max_consecutive_weekends {
                Rejection::WeekendString
            } else {
                Rejection::WeekendQuota
            },
        );
    }
    Ok(())
}

/// Index des médecins candidats, dans l'ordre d'entrée.
pub(super) fn candidates(doctors: &[Doctor], shift: &Shift, rules: &Rules) -> Vec<usize> {
    doctors
        .iter()
        .enumerate()
        .filter_map(|(idx, doctor)| match check_candidate(doctor, shift, rules) {
            Ok(()) => Some(idx),
            Err(reason) => {
                tracing::trace!(doctor = doctor.name(), ?reason, shift = %shift.label(), "rejected");
                None
            }
        })
        .collect()
}
