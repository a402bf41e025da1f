#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use residency_roster::{
    detect_conflicts, io,
    report::{summarize, RosterRenderer, TextReport},
    scheduler::{self, ConflictKind, SchedError},
    storage::{JsonStorage, Storage},
    Block, Rules,
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des gardes de résidents
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Résoudre un roster à partir des CSV de médecins et de shifts
    Solve {
        #[arg(long)]
        doctors: PathBuf,
        #[arg(long)]
        shifts: PathBuf,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        block_start: i32,
        #[arg(long, default_value_t = 28)]
        block_end: i32,
        #[command(flatten)]
        rules: RuleArgs,
        /// Roster résolu (JSON, écriture atomique)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Export CSV des shifts
        #[arg(long)]
        out_csv: Option<PathBuf>,
        /// Date du jour 1 (un lundi), AAAA-MM-JJ
        #[arg(long)]
        anchor_date: Option<NaiveDate>,
    },

    /// Vérifier les conflits d'un roster résolu
    Check {
        #[arg(long)]
        roster: PathBuf,
        #[command(flatten)]
        rules: RuleArgs,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Afficher le rapport d'un roster résolu
    Report {
        #[arg(long)]
        roster: PathBuf,
        #[arg(long)]
        anchor_date: Option<NaiveDate>,
        /// Bilan par médecin en JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct RuleArgs {
    /// Fichier JSON de règles, surchargé par les options ci-dessous
    #[arg(long)]
    rules: Option<PathBuf>,
    #[arg(long)]
    max_consecutive_nights: Option<u32>,
    #[arg(long)]
    max_consecutive_weekends: Option<u32>,
    #[arg(long)]
    weekly_hour_cap: Option<u32>,
    /// 1 = un seul candidat essayé par shift
    #[arg(long)]
    candidates_per_shift: Option<usize>,
    #[arg(long)]
    node_limit: Option<u64>,
    /// Laisser les shifts optionnels vides
    #[arg(long)]
    skip_optional: bool,
}

impl RuleArgs {
    fn resolve(&self) -> Result<Rules> {
        let mut rules = match &self.rules {
            Some(path) => Rules::from_json_file(path)?,
            None => Rules::default(),
        };
        if let Some(v) = self.max_consecutive_nights {
            rules.max_consecutive_nights = v;
        }
        if let Some(v) = self.max_consecutive_weekends {
            rules.max_consecutive_weekends = v;
        }
        if let Some(v) = self.weekly_hour_cap {
            rules.weekly_hour_cap = v;
        }
        if self.candidates_per_shift.is_some() {
            rules.candidates_per_shift = self.candidates_per_shift;
        }
        if self.node_limit.is_some() {
            rules.node_limit = self.node_limit;
        }
        if self.skip_optional {
            rules.skip_optional_shifts = true;
        }
        Ok(rules)
    }
}

fn check_anchor(anchor: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    if let Some(date) = anchor {
        if date.weekday() != Weekday::Mon {
            bail!("anchor date {date} is a {}, day 1 must be a Monday", date.weekday());
        }
    }
    Ok(anchor)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Solve {
            doctors,
            shifts,
            block_start,
            block_end,
            rules,
            out,
            out_csv,
            anchor_date,
        } => {
            let anchor = check_anchor(anchor_date)?;
            let block = Block::new(block_start, block_end)?;
            let rules = rules.resolve()?;
            let doctors = io::import_doctors_csv(&doctors, &block)?;
            let shifts = io::import_shifts_csv(&shifts, &block)?;

            match scheduler::solve(block, doctors, shifts, rules) {
                Ok((roster, stats)) => {
                    if let Some(path) = out {
                        JsonStorage::open(path).save(&roster)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_shifts_csv(path, &roster)?;
                    }
                    print!("{}", TextReport { anchor }.render(&roster));
                    println!(
                        "Search: {} nodes, {} backtracks",
                        stats.nodes, stats.backtracks
                    );
                    0
                }
                Err(err @ (SchedError::Infeasible { .. } | SchedError::NodeLimitReached { .. })) => {
                    eprintln!("{err}");
                    // Code 2 = INFEASIBLE/INCOMPLETE
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Check {
            roster,
            rules,
            report,
        } => {
            let rules = rules.resolve()?;
            let roster = JsonStorage::open(roster).load()?;
            let conflicts = detect_conflicts(&roster, &rules);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["doctor", "shift_a", "shift_b", "kind"])?;
                    for c in &conflicts {
                        let kind = match &c.kind {
                            ConflictKind::Overlap => "overlap".to_string(),
                            ConflictKind::RestViolation => "rest".to_string(),
                            ConflictKind::WeeklyCap {
                                week_start_day,
                                hours,
                            } => format!("weekly-cap:{week_start_day}:{hours}"),
                            ConflictKind::Unassigned => "unassigned".to_string(),
                        };
                        w.write_record([
                            c.doctor.as_ref().map(|d| d.as_str()).unwrap_or(""),
                            c.shift_a.as_str(),
                            c.shift_b.as_ref().map(|s| s.as_str()).unwrap_or(""),
                            kind.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
        Commands::Report {
            roster,
            anchor_date,
            json,
        } => {
            let anchor = check_anchor(anchor_date)?;
            let roster = JsonStorage::open(roster).load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summarize(&roster))?);
            } else {
                print!("{}", TextReport { anchor }.render(&roster));
            }
            0
        }
    };

    std::process::exit(code);
}
