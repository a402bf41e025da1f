#![forbid(unsafe_code)]
use proptest::prelude::*;
use residency_roster::model::{Block, Doctor, DoctorProfile, Shift};
use residency_roster::{detect_conflicts, Location, Rules, SchedError, Scheduler, Seniority};

#[derive(Debug, Clone)]
enum Op {
    Assign {
        location: Location,
        day: i32,
        time: u8,
        duration: u32,
    },
    ResetWeek,
    /// Défait la dernière opération encore en place (assignation ou semaine).
    Undo,
}

/// Ce que la pile du moteur contient, dans l'ordre des commits.
#[derive(Debug)]
enum Frame {
    Assigned(u32),
    Week,
}

fn shift_params() -> impl Strategy<Value = (Location, i32, u8, u32)> {
    (
        prop::sample::select(Location::ALL.to_vec()),
        2i32..=27,
        0u8..24,
        prop::sample::select(vec![8u32, 9, 10, 12]),
    )
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => shift_params().prop_map(|(location, day, time, duration)| Op::Assign {
            location,
            day,
            time,
            duration,
        }),
        1 => Just(Op::ResetWeek),
        2 => Just(Op::Undo),
    ]
}

fn fresh() -> Doctor {
    let mut profile = DoctorProfile::new("prop", Seniority::OffService);
    profile.pre_block_hours = 4;
    profile.carry_hours = -4;
    Doctor::new(Block::default(), profile).unwrap()
}

proptest! {
    #[test]
    fn ledger_matches_history(ops in prop::collection::vec(op(), 0..60)) {
        let block = Block::default();
        let mut doctor = fresh();
        let mut frames: Vec<Frame> = Vec::new();
        let mut weeks: Vec<u32> = vec![4];

        for op in ops {
            match op {
                Op::Assign { location, day, time, duration } => {
                    let shift = Shift::new(
                        &block, location, day, time, duration, Seniority::ALL.to_vec(), false,
                    ).unwrap();
                    let before = doctor.clone();
                    doctor.assign(&shift);

                    let mut undone = doctor.clone();
                    undone.unassign().unwrap();
                    prop_assert_eq!(&undone, &before);

                    frames.push(Frame::Assigned(duration));
                    if let Some(week) = weeks.last_mut() {
                        *week += duration;
                    }
                }
                Op::ResetWeek => {
                    let before = doctor.clone();
                    doctor.reset_week(7 * weeks.len() as i32);

                    let mut undone = doctor.clone();
                    undone.undo_reset_week().unwrap();
                    prop_assert_eq!(&undone, &before);

                    frames.push(Frame::Week);
                    weeks.push(0);
                }
                Op::Undo => match frames.pop() {
                    Some(Frame::Assigned(duration)) => {
                        prop_assert_eq!(doctor.unassign().unwrap().duration, duration);
                        if let Some(week) = weeks.last_mut() {
                            *week -= duration;
                        }
                    }
                    Some(Frame::Week) => {
                        doctor.undo_reset_week().unwrap();
                        weeks.pop();
                    }
                    None => {
                        prop_assert!(doctor.unassign().is_err());
                        prop_assert!(doctor.undo_reset_week().is_err());
                    }
                },
            }

            let history = doctor.history();
            let total: u32 = history.iter().map(|s| s.duration).sum();
            let nights = history.iter().filter(|s| s.night).count() as u32;
            let weekends = history.iter().filter(|s| s.weekend).count() as u32;

            prop_assert_eq!(doctor.consecutive_night_shifts(), doctor.recompute_consecutive_nights());
            prop_assert_eq!(doctor.consecutive_weekend_shifts(), doctor.recompute_consecutive_weekends());
            prop_assert_eq!(doctor.actual_hours(), 4 + i64::from(total));
            prop_assert_eq!(doctor.actual_nights(), nights);
            prop_assert_eq!(doctor.actual_weekends(), weekends);
            prop_assert_eq!(doctor.actual_shifts() as usize, history.len());
            prop_assert_eq!(doctor.weekly_hours(), weeks.as_slice());
            prop_assert_eq!(doctor.weekly_hours().iter().sum::<u32>(), 4 + total);
            prop_assert_eq!(doctor.location_hours().values().sum::<u32>(), total);
            prop_assert_eq!(doctor.mandatory_timeoff().len(), history.len());
        }
    }
}

fn instance() -> impl Strategy<Value = (Vec<Seniority>, Vec<(Location, i32, u8, u32, Vec<Seniority>)>)> {
    let seniority = prop::sample::select(Seniority::ALL.to_vec());
    let prefs = prop::sample::subsequence(Seniority::ALL.to_vec(), 1..=5).prop_shuffle();
    let shift = (shift_params(), prefs)
        .prop_map(|((location, day, time, duration), prefs)| (location, day, time, duration, prefs));
    (
        prop::collection::vec(seniority, 1..=4),
        prop::collection::vec(shift, 5..=20),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn solved_rosters_respect_hard_constraints((seniorities, raw_shifts) in instance()) {
        let block = Block::default();
        let doctors: Vec<Doctor> = seniorities
            .iter()
            .enumerate()
            .map(|(idx, &seniority)| {
                Doctor::new(block, DoctorProfile::new(format!("doc{idx}"), seniority)).unwrap()
            })
            .collect();
        let shifts: Vec<Shift> = raw_shifts
            .into_iter()
            .map(|(location, day, time, duration, prefs)| {
                Shift::new(&block, location, day, time, duration, prefs, false).unwrap()
            })
            .collect();
        let rules = Rules {
            node_limit: Some(20_000),
            ..Rules::default()
        };

        let mut scheduler = Scheduler::new(block, doctors.clone(), shifts, rules).unwrap();
        match scheduler.solve() {
            Ok(_) => {
                for doctor in scheduler.doctors() {
                    let total: u32 = doctor.history().iter().map(|s| s.duration).sum();
                    prop_assert_eq!(doctor.actual_hours(), i64::from(total));
                    prop_assert!(doctor
                        .weekly_hours()
                        .iter()
                        .all(|&hours| hours <= rules.weekly_hour_cap));
                }
                let roster = scheduler.into_roster();
                prop_assert!(roster.shifts.iter().all(|s| s.assigned_doctor().is_some()));
                let conflicts = detect_conflicts(&roster, &rules);
                prop_assert!(conflicts.is_empty(), "{:?}", conflicts);
            }
            Err(SchedError::Infeasible { .. } | SchedError::NodeLimitReached { .. }) => {
                prop_assert_eq!(scheduler.doctors(), doctors.as_slice());
                prop_assert!(scheduler.shifts().iter().all(|s| s.assigned_doctor().is_none()));
            }
            Err(other) => prop_assert!(false, "ledger error: {}", other),
        }
    }
}
