use crate::config::{Location, Seniority};
use crate::model::{
    Block, Doctor, DoctorProfile, Eligibility, Roster, Shift, TimeOff, TimeOffKind,
    ValidationError,
};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Cellule explicitement nulle.
const NULL_CELL: &str = "_";

#[derive(Debug, Deserialize)]
struct DoctorRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Seniority")]
    seniority: i64,
    #[serde(rename = "Chief")]
    chief: String,
    #[serde(rename = "Carried Hours")]
    carried_hours: f64,
    #[serde(rename = "Half Block")]
    half_block: String,
    #[serde(rename = "Pre Block Hours")]
    pre_block_hours: u32,
    #[serde(rename = "Requested Day:Time:Duration")]
    requested: String,
    #[serde(rename = "Mandatory Day:Time:Duration")]
    mandatory: String,
}

#[derive(Debug, Deserialize)]
struct ShiftRow {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Day")]
    day: i32,
    #[serde(rename = "Time")]
    time: u8,
    #[serde(rename = "Duration")]
    duration: u32,
    #[serde(rename = "Position Preferences")]
    preferences: String,
    #[serde(rename = "Optional")]
    optional: String,
}

/// Import des médecins depuis CSV: header `Name,Seniority,Chief,Carried Hours,
/// Half Block,Pre Block Hours,Requested Day:Time:Duration,Mandatory Day:Time:Duration`
pub fn import_doctors_csv<P: AsRef<Path>>(path: P, block: &Block) -> anyhow::Result<Vec<Doctor>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_doctors(file, block).with_context(|| format!("reading doctors from {}", path.display()))
}

pub fn read_doctors<R: Read>(reader: R, block: &Block) -> anyhow::Result<Vec<Doctor>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let line = idx + 2;
        if !row_has_data(&rec).with_context(|| format!("doctors row {line}"))? {
            continue;
        }
        let row: DoctorRow = rec
            .deserialize(Some(&headers))
            .with_context(|| format!("doctors row {line}"))?;
        out.push(doctor_from_row(block, row).with_context(|| format!("doctors row {line}"))?);
    }
    Ok(out)
}

/// Import des shifts depuis CSV: header `Location,Day,Time,Duration,
/// Position Preferences,Optional`
pub fn import_shifts_csv<P: AsRef<Path>>(path: P, block: &Block) -> anyhow::Result<Vec<Shift>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_shifts(file, block).with_context(|| format!("reading shifts from {}", path.display()))
}

pub fn read_shifts<R: Read>(reader: R, block: &Block) -> anyhow::Result<Vec<Shift>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let line = idx + 2;
        if !row_has_data(&rec).with_context(|| format!("shifts row {line}"))? {
            continue;
        }
        let row: ShiftRow = rec
            .deserialize(Some(&headers))
            .with_context(|| format!("shifts row {line}"))?;
        let location: Location = row
            .location
            .parse()
            .map_err(ValidationError::UnknownLocation)
            .with_context(|| format!("shifts row {line}"))?;
        let preferences = parse_preferences(&row.preferences)
            .with_context(|| format!("shifts row {line}"))?;
        let optional = parse_bool(&row.optional)
            .with_context(|| format!("invalid Optional value on shifts row {line}"))?;
        let shift = Shift::new(
            block,
            location,
            row.day,
            row.time,
            row.duration,
            preferences,
            optional,
        )
        .with_context(|| format!("shifts row {line}"))?;
        out.push(shift);
    }
    Ok(out)
}

/// Liste de congés `day:time:duration` séparés par des espaces, `_` si vide.
pub fn parse_time_offs(
    block: &Block,
    owner: &str,
    raw: &str,
    kind: TimeOffKind,
) -> anyhow::Result<Vec<TimeOff>> {
    let raw = raw.trim();
    if raw == NULL_CELL {
        return Ok(Vec::new());
    }
    raw.split_whitespace()
        .map(|chunk| parse_time_off(block, owner, chunk, kind))
        .collect()
}

fn parse_time_off(
    block: &Block,
    owner: &str,
    chunk: &str,
    kind: TimeOffKind,
) -> anyhow::Result<TimeOff> {
    let parts: Vec<&str> = chunk.split(':').collect();
    let [day, time, duration] = parts.as_slice() else {
        bail!("incorrect format for time-off, found {chunk}, expecting Day:Time:Duration");
    };
    let day: i32 = day
        .parse()
        .with_context(|| format!("invalid day in time-off {chunk}"))?;
    let time: u8 = time
        .parse()
        .with_context(|| format!("invalid time in time-off {chunk}"))?;
    let duration: u32 = duration
        .parse()
        .with_context(|| format!("invalid duration in time-off {chunk}"))?;
    let timeoff = match kind {
        TimeOffKind::Requested => TimeOff::requested(block, owner, day, time, duration)?,
        TimeOffKind::Mandatory => TimeOff::mandatory(block, owner, day, time, duration)?,
    };
    Ok(timeoff)
}

/// Préférences de poste séparées par `>`, ex. `1>2>3`.
pub fn parse_preferences(raw: &str) -> anyhow::Result<Vec<Seniority>> {
    raw.split('>')
        .map(|chunk| -> anyhow::Result<Seniority> {
            let code: i64 = chunk.trim().parse().with_context(|| {
                format!("preference {chunk:?} in {raw:?} must be a seniority code")
            })?;
            Ok(Seniority::from_code(code).ok_or(ValidationError::UnknownSeniority(code))?)
        })
        .collect()
}

fn doctor_from_row(block: &Block, row: DoctorRow) -> anyhow::Result<Doctor> {
    let seniority = Seniority::from_code(row.seniority)
        .ok_or(ValidationError::UnknownSeniority(row.seniority))?;
    let chief = parse_bool(&row.chief)
        .with_context(|| format!("invalid Chief value for {}", row.name))?;
    if row.carried_hours.fract() != 0.0 {
        bail!(
            "carried hours for {} must be a whole number, found {}",
            row.name,
            row.carried_hours
        );
    }
    // la conversion f64 -> i64 sature, i32::try_from vérifie la plage
    let carry_hours = i32::try_from(row.carried_hours as i64).map_err(|_| {
        anyhow::anyhow!(
            "carried hours for {} out of range, found {}",
            row.name,
            row.carried_hours
        )
    })?;
    let eligibility: Eligibility = row.half_block.parse()?;

    let mut profile = DoctorProfile::new(&row.name, seniority);
    profile.chief = chief;
    profile.carry_hours = carry_hours;
    profile.eligibility = eligibility;
    profile.pre_block_hours = row.pre_block_hours;
    profile.requested_timeoff =
        parse_time_offs(block, &row.name, &row.requested, TimeOffKind::Requested)?;
    profile.mandatory_timeoff =
        parse_time_offs(block, &row.name, &row.mandatory, TimeOffKind::Mandatory)?;

    Doctor::new(*block, profile).with_context(|| format!("invalid doctor {}", row.name))
}

/// `false` pour une ligne entièrement vide (ignorée). Une ligne qui mêle
/// cellules vides et `_` est refusée.
fn row_has_data(rec: &StringRecord) -> anyhow::Result<bool> {
    let empty = rec.iter().filter(|cell| cell.is_empty()).count();
    if empty == rec.len() {
        return Ok(false);
    }
    if empty > 0 {
        if rec.iter().any(|cell| cell == NULL_CELL) {
            bail!("row found with empty string and null value");
        }
        bail!("row has an empty cell, use '{NULL_CELL}' for an explicit null");
    }
    Ok(true)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean, found {s:?}"),
    }
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `id,location,day,time,duration,night,weekend,doctor`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_shifts_csv(file, roster)
}

pub fn write_shifts_csv<W: Write>(writer: W, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record([
        "id", "location", "day", "time", "duration", "night", "weekend", "doctor",
    ])?;
    for s in &roster.shifts {
        let doctor = s.assigned_doctor().map(|d| d.as_str()).unwrap_or("");
        let day = s.start_day().to_string();
        let time = s.start_time().to_string();
        let duration = s.duration().to_string();
        let night = s.night().to_string();
        let weekend = s.weekend().to_string();
        w.write_record([
            s.id().as_str(),
            s.location().as_str(),
            day.as_str(),
            time.as_str(),
            duration.as_str(),
            night.as_str(),
            weekend.as_str(),
            doctor,
        ])?;
    }
    w.flush()?;
    Ok(())
}
