#![forbid(unsafe_code)]
use residency_roster::io::{parse_preferences, parse_time_offs, read_doctors, read_shifts, write_shifts_csv};
use residency_roster::model::{Block, TimeOffKind};
use residency_roster::{solve, Eligibility, Location, Rules, Seniority};

const DOCTOR_HEADER: &str = "Name,Seniority,Chief,Carried Hours,Half Block,Pre Block Hours,Requested Day:Time:Duration,Mandatory Day:Time:Duration\n";
const SHIFT_HEADER: &str = "Location,Day,Time,Duration,Position Preferences,Optional\n";

fn block() -> Block {
    Block::new(1, 28).unwrap()
}

#[test]
fn reads_doctor_rows() {
    let data = format!(
        "{DOCTOR_HEADER}Ben Hong,4,Yes,-12,Both,0,_,5:7:8 6:7:8\n ,,,,,,,\n  Ana Ruiz , 0 ,No,-6,2,6,15:7:12,_\n"
    );
    let doctors = read_doctors(data.as_bytes(), &block()).unwrap();
    assert_eq!(doctors.len(), 2);

    let ben = &doctors[0];
    assert_eq!(ben.name(), "Ben Hong");
    assert_eq!(ben.seniority(), Seniority::FourthYear);
    assert!(ben.chief());
    assert_eq!(ben.expected_hours(), 124.0);
    assert_eq!(ben.carry_hours(), -12);
    assert_eq!(ben.actual_hours(), 12);
    // 2 congés imposés + 4 conférences
    assert_eq!(ben.mandatory_timeoff().len(), 6);

    let ana = &doctors[1];
    assert_eq!(ana.name(), "Ana Ruiz");
    assert_eq!(ana.eligibility(), Eligibility::SecondHalf);
    assert_eq!(ana.pre_block_hours(), 6);
    assert_eq!(ana.requested_timeoff().len(), 1);
    assert!(ana.mandatory_timeoff().is_empty());
}

#[test]
fn rejects_row_mixing_empty_and_null_cells() {
    let data = format!("{DOCTOR_HEADER}Ben Hong,4,Yes,0,Both,0,,_\n");
    let err = read_doctors(data.as_bytes(), &block()).unwrap_err();
    assert!(format!("{err:#}").contains("row found with empty string and null value"));
}

#[test]
fn rejects_malformed_time_off() {
    let err = parse_time_offs(&block(), "ben", "5:7:8 13:7", TimeOffKind::Mandatory).unwrap_err();
    assert!(err
        .to_string()
        .contains("incorrect format for time-off, found 13:7, expecting Day:Time:Duration"));

    assert!(parse_time_offs(&block(), "ben", " _ ", TimeOffKind::Requested)
        .unwrap()
        .is_empty());
}

#[test]
fn rejects_fractional_carry() {
    let data = format!("{DOCTOR_HEADER}Ben Hong,4,No,-1.5,Both,0,_,_\n");
    let err = read_doctors(data.as_bytes(), &block()).unwrap_err();
    assert!(format!("{err:#}").contains("whole number"));
}

#[test]
fn rejects_carry_out_of_range() {
    let data = format!("{DOCTOR_HEADER}Ben Hong,4,No,-1000000000000,Both,0,_,_\n");
    let err = read_doctors(data.as_bytes(), &block()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("doctors row 2"));
    assert!(msg.contains("out of range"));
}

#[test]
fn reads_shift_rows() {
    let data = format!("{SHIFT_HEADER}Resus,1,10,9,0>1>2>3,False\nacute 2,6,19,12,4,True\n");
    let shifts = read_shifts(data.as_bytes(), &block()).unwrap();
    assert_eq!(shifts.len(), 2);

    let resus = &shifts[0];
    assert_eq!(resus.location(), Location::Resus);
    assert_eq!(resus.duration(), 9);
    assert_eq!(
        resus.position_preferences(),
        &[
            Seniority::OffService,
            Seniority::FirstYear,
            Seniority::SecondYear,
            Seniority::ThirdYear
        ]
    );
    assert!(!resus.optional());

    let night = &shifts[1];
    assert_eq!(night.location(), Location::Acute2);
    assert!(night.optional());
    assert!(night.night());
    assert!(night.weekend());
}

#[test]
fn rejects_unknown_location_and_bad_preferences() {
    let data = format!("{SHIFT_HEADER}Trauma,1,10,9,1,False\n");
    let err = read_shifts(data.as_bytes(), &block()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("shifts row 2"));
    assert!(msg.contains("unknown location: Trauma"));

    let data = format!("{SHIFT_HEADER}Resus,1,10,11,1,False\n");
    let err = read_shifts(data.as_bytes(), &block()).unwrap_err();
    assert!(format!("{err:#}").contains("shifts row 2"));

    assert!(parse_preferences("1>7").is_err());
    assert!(parse_preferences("1>>2").is_err());
    assert_eq!(
        parse_preferences("4>3").unwrap(),
        vec![Seniority::FourthYear, Seniority::ThirdYear]
    );
}

#[test]
fn writes_shift_csv() {
    let doctors = read_doctors(
        format!("{DOCTOR_HEADER}Ben Hong,0,No,0,Both,0,_,_\n").as_bytes(),
        &block(),
    )
    .unwrap();
    let shifts = read_shifts(
        format!("{SHIFT_HEADER}Resus,2,7,8,0,False\n").as_bytes(),
        &block(),
    )
    .unwrap();
    let (roster, _) = solve(block(), doctors, shifts, Rules::default()).unwrap();

    let mut buf = Vec::new();
    write_shifts_csv(&mut buf, &roster).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,location,day,time,duration,night,weekend,doctor")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with(roster.shifts[0].id().as_str()));
    assert!(row.ends_with(",Resus,2,7,8,false,false,Ben Hong"));
    assert_eq!(lines.next(), None);
}
