use crate::config::Location;
use crate::model::{Block, Roster};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Bilan d'un médecin après résolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorSummary {
    pub name: String,
    pub seniority: String,
    pub shifts: u32,
    pub hours: i64,
    pub expected_hours: f64,
    pub nights: u32,
    pub expected_nights: (f64, f64),
    pub weekends: u32,
    pub expected_weekends: (f64, f64),
    pub location_hours: BTreeMap<Location, u32>,
}

pub fn summarize(roster: &Roster) -> Vec<DoctorSummary> {
    roster
        .doctors
        .iter()
        .map(|d| DoctorSummary {
            name: d.name().to_string(),
            seniority: d.seniority().to_string(),
            shifts: d.actual_shifts(),
            hours: d.actual_hours(),
            expected_hours: d.expected_hours(),
            nights: d.actual_nights(),
            expected_nights: (d.expected_nights().lower, d.expected_nights().upper),
            weekends: d.actual_weekends(),
            expected_weekends: (d.expected_weekends().lower, d.expected_weekends().upper),
            location_hours: d.location_hours().clone(),
        })
        .collect()
}

/// Permet de customiser le rendu du roster (texte, HTML, etc.).
pub trait RosterRenderer {
    fn render(&self, roster: &Roster) -> String;
}

/// Rendu texte : liste des shifts puis bilan par médecin. Avec `anchor`
/// (date du jour 1, un lundi), chaque jour est aussi affiché en date.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport {
    pub anchor: Option<NaiveDate>,
}

impl TextReport {
    fn day_label(&self, day: i32) -> String {
        let weekday = Block::weekday(day);
        match self
            .anchor
            .and_then(|a| a.checked_add_signed(Duration::days(i64::from(day - 1))))
        {
            Some(date) => format!("day {day} {weekday} {}", date.format("%Y-%m-%d")),
            None => format!("day {day} {weekday}"),
        }
    }
}

impl RosterRenderer for TextReport {
    fn render(&self, roster: &Roster) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Block [{}, {}]",
            roster.block.start_day(),
            roster.block.end_day()
        );

        let _ = writeln!(out, "Shifts:");
        for s in &roster.shifts {
            let doctor = s.assigned_doctor().map(|d| d.as_str()).unwrap_or("-");
            let mut flags = String::new();
            if s.night() {
                flags.push_str(" night");
            }
            if s.weekend() {
                flags.push_str(" weekend");
            }
            let _ = writeln!(
                out,
                "  {} {:02}:00 +{}h {}{} -> {}",
                self.day_label(s.start_day()),
                s.start_time(),
                s.duration(),
                s.location(),
                flags,
                doctor
            );
        }

        let _ = writeln!(out, "Doctors:");
        for row in summarize(roster) {
            let locations: Vec<String> = row
                .location_hours
                .iter()
                .map(|(loc, hours)| format!("{loc}={hours}"))
                .collect();
            let _ = writeln!(
                out,
                "  {} ({}) shifts={} hours={}/{:.1} nights={} [{:.1}, {:.1}] weekends={} [{:.1}, {:.1}] | {}",
                row.name,
                row.seniority,
                row.shifts,
                row.hours,
                row.expected_hours,
                row.nights,
                row.expected_nights.0,
                row.expected_nights.1,
                row.weekends,
                row.expected_weekends.0,
                row.expected_weekends.1,
                locations.join(" ")
            );
        }
        out
    }
}
