use crate::model::{Doctor, Shift};
use std::cmp::Ordering;

/// Ordre de préférence entre deux candidats pour `shift` ; `Less` signifie
/// que `a` passe avant `b`. Critères, du plus fort au plus faible :
///
/// 1. pas de congé demandé sur ce shift ;
/// 2. série de nuits en cours la plus longue ;
/// 3. série de week-ends en cours la plus longue ;
/// 4. le plus de week-ends restant à faire ;
/// 5. le plus de nuits restant à faire ;
/// 6. ancienneté la mieux placée dans les préférences du shift ;
/// 7. le plus d'heures restant à faire ;
/// 8. le moins d'heures déjà faites à cet emplacement.
pub fn compare_candidates(a: &Doctor, b: &Doctor, shift: &Shift) -> Ordering {
    let location = shift.location();
    let preference = |d: &Doctor| shift.preference_rank(d.seniority()).unwrap_or(usize::MAX);

    a.requests_time_off_during(shift)
        .cmp(&b.requests_time_off_during(shift))
        .then_with(|| b.consecutive_night_shifts().cmp(&a.consecutive_night_shifts()))
        .then_with(|| b.consecutive_weekend_shifts().cmp(&a.consecutive_weekend_shifts()))
        .then_with(|| b.weekends_needed().total_cmp(&a.weekends_needed()))
        .then_with(|| b.nights_needed().total_cmp(&a.nights_needed()))
        .then_with(|| preference(a).cmp(&preference(b)))
        .then_with(|| b.hours_needed().total_cmp(&a.hours_needed()))
        .then_with(|| a.hours_at(location).cmp(&b.hours_at(location)))
}

/// Tri stable : à égalité, l'ordre d'entrée des médecins est conservé.
pub(super) fn rank(candidates: &mut [usize], doctors: &[Doctor], shift: &Shift) {
    candidates.sort_by(|&a, &b| compare_candidates(&doctors[a], &doctors[b], shift));
}
