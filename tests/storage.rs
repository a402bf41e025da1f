#![forbid(unsafe_code)]
use residency_roster::model::{Block, Doctor, DoctorProfile, Shift};
use residency_roster::{
    detect_conflicts, solve, JsonStorage, Location, Rules, Seniority, Storage,
};
use tempfile::tempdir;

#[test]
fn save_and_load_roster_roundtrip() {
    let dir = tempdir().unwrap();
    let store = JsonStorage::open(dir.path().join("roster.json"));

    let block = Block::new(-2, 25).unwrap();
    let doctors = vec![
        Doctor::new(block, DoctorProfile::new("ana", Seniority::FirstYear)).unwrap(),
        Doctor::new(block, DoctorProfile::new("ben", Seniority::ThirdYear)).unwrap(),
    ];
    let shifts = (4..8)
        .map(|day| {
            Shift::new(&block, Location::Acute2, day, 9, 10, Seniority::ALL.to_vec(), false)
                .unwrap()
        })
        .collect();
    let (roster, _) = solve(block, doctors, shifts, Rules::default()).unwrap();
    store.save(&roster).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.block, block);
    assert_eq!(loaded.doctors, roster.doctors);
    assert_eq!(loaded.shifts, roster.shifts);
    assert!(detect_conflicts(&loaded, &Rules::default()).is_empty());
}

#[test]
fn load_rejects_doctor_from_another_block() {
    let dir = tempdir().unwrap();
    let store = JsonStorage::open(dir.path().join("roster.json"));

    let block = Block::default();
    let other = Block::new(2, 28).unwrap();
    let (mut roster, _) = solve(block, vec![], vec![], Rules::default()).unwrap();
    roster
        .doctors
        .push(Doctor::new(other, DoctorProfile::new("cy", Seniority::FourthYear)).unwrap());
    store.save(&roster).unwrap();

    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("different block"));
}
