use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Les tables de charge ci-dessous valent pour un bloc de 28 jours,
/// proratisées ensuite par médecin.
pub const STANDARD_BLOCK_DAYS: u32 = 28;

/// Heures attendues d'un résident en chef, quelle que soit l'ancienneté.
pub const CHIEF_EXPECTED_HOURS: f64 = 124.0;

/// Conférence hebdomadaire : jour (`day % 7`), heure de début, durée.
pub const CONFERENCE_WEEKDAY: i32 = 3;
pub const CONFERENCE_START: u8 = 7;
pub const CONFERENCE_HOURS: u32 = 8;

/// Niveau d'ancienneté d'un résident (codes numériques en entrée).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seniority {
    /// Résidents hors urgence, en stage.
    OffService,
    FirstYear,
    SecondYear,
    ThirdYear,
    FourthYear,
}

impl Seniority {
    pub const ALL: [Seniority; 5] = [
        Seniority::OffService,
        Seniority::FirstYear,
        Seniority::SecondYear,
        Seniority::ThirdYear,
        Seniority::FourthYear,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::OffService),
            1 => Some(Self::FirstYear),
            2 => Some(Self::SecondYear),
            3 => Some(Self::ThirdYear),
            4 => Some(Self::FourthYear),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::OffService => 0,
            Self::FirstYear => 1,
            Self::SecondYear => 2,
            Self::ThirdYear => 3,
            Self::FourthYear => 4,
        }
    }

    /// Heures attendues sur un bloc standard de 28 jours.
    pub fn standard_hours(self) -> f64 {
        match self {
            Self::OffService | Self::FirstYear => 200.0,
            Self::SecondYear => 170.0,
            Self::ThirdYear => 165.0,
            Self::FourthYear => 136.0,
        }
    }

    /// Plage inclusive de nuits sur 28 jours.
    pub fn standard_nights(self) -> (f64, f64) {
        match self {
            Self::OffService | Self::FirstYear => (8.0, 10.0),
            Self::SecondYear => (6.0, 8.0),
            Self::ThirdYear => (5.0, 7.0),
            Self::FourthYear => (4.0, 5.0),
        }
    }

    /// Plage inclusive de week-ends sur 28 jours.
    pub fn standard_weekends(self) -> (f64, f64) {
        match self {
            Self::OffService | Self::FirstYear => (4.0, 5.0),
            Self::SecondYear | Self::ThirdYear => (4.0, 4.0),
            Self::FourthYear => (3.0, 4.0),
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OffService => "off-service",
            Self::FirstYear => "R1",
            Self::SecondYear => "R2",
            Self::ThirdYear => "R3",
            Self::FourthYear => "R4",
        };
        f.write_str(label)
    }
}

/// Zone du service où se déroule un shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Acute1,
    Acute2,
    Resus,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Acute1, Location::Acute2, Location::Resus];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Acute1 => "Acute 1",
            Self::Acute2 => "Acute 2",
            Self::Resus => "Resus",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| wanted.to_string())
    }
}

/// Limites dures et réglages de la recherche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub max_consecutive_nights: u32,
    pub max_consecutive_weekends: u32,
    pub weekly_hour_cap: u32,
    /// Nombre de candidats essayés par shift (`None` = tous).
    pub candidates_per_shift: Option<usize>,
    /// Abandon après ce nombre de nœuds visités.
    pub node_limit: Option<u64>,
    pub skip_optional_shifts: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_consecutive_nights: 5,
            max_consecutive_weekends: 2,
            weekly_hour_cap: 60,
            candidates_per_shift: None,
            node_limit: None,
            skip_optional_shifts: false,
        }
    }
}

impl Rules {
    /// Charge des règles JSON ; les champs absents gardent leur défaut.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading rules {}", path.display()))?;
        let rules: Rules = serde_json::from_slice(&data)
            .with_context(|| format!("parsing rules {}", path.display()))?;
        Ok(rules)
    }
}
