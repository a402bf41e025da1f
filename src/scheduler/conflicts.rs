use super::{Conflict, ConflictKind, Rules};
use crate::model::{Block, Eligibility, Roster, Shift, TimeOff, SECOND_HALF_START_DAY};
use std::collections::BTreeMap;

/// Vérifie un roster indépendamment du moteur : chevauchements, repos,
/// plafond hebdomadaire et shifts restés sans médecin.
pub fn detect_conflicts(roster: &Roster, rules: &Rules) -> Vec<Conflict> {
    let mut out = Vec::new();

    for doctor in &roster.doctors {
        let mut shifts: Vec<&Shift> = roster.shifts_of(doctor.id()).collect();
        shifts.sort_by_key(|s| (s.start_day(), s.start_time()));

        for (idx, a) in shifts.iter().enumerate() {
            let rest = TimeOff::rest_after(a.start_day(), a.start_time(), a.duration()).interval();
            for b in shifts.iter().skip(idx + 1) {
                let kind = if a.interval().overlaps(&b.interval()) {
                    ConflictKind::Overlap
                } else if rest.overlaps(&b.interval()) {
                    ConflictKind::RestViolation
                } else {
                    continue;
                };
                out.push(Conflict {
                    doctor: Some(doctor.id().clone()),
                    shift_a: a.id().clone(),
                    shift_b: Some(b.id().clone()),
                    kind,
                });
            }
        }

        let mut weeks: BTreeMap<i64, u32> = BTreeMap::new();
        if doctor.pre_block_hours() > 0 {
            let seeded_week = match doctor.eligibility() {
                Eligibility::SecondHalf => Block::week_index(SECOND_HALF_START_DAY, 7),
                Eligibility::Full | Eligibility::FirstHalf => {
                    Block::week_index(roster.block.start_day(), 7)
                }
            };
            weeks.insert(seeded_week, doctor.pre_block_hours());
        }
        for shift in &shifts {
            let week = Block::week_index(shift.start_day(), shift.start_time());
            let hours = weeks.entry(week).or_insert(0);
            let before = *hours;
            *hours += shift.duration();
            if before <= rules.weekly_hour_cap && *hours > rules.weekly_hour_cap {
                out.push(Conflict {
                    doctor: Some(doctor.id().clone()),
                    shift_a: shift.id().clone(),
                    shift_b: None,
                    kind: ConflictKind::WeeklyCap {
                        week_start_day: Block::week_start_day(week),
                        hours: *hours,
                    },
                });
            }
        }
    }

    for shift in roster.unassigned() {
        if rules.skip_optional_shifts && shift.optional() {
            continue;
        }
        out.push(Conflict {
            doctor: None,
            shift_a: shift.id().clone(),
            shift_b: None,
            kind: ConflictKind::Unassigned,
        });
    }

    out
}
