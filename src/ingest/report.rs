use std::fmt;
use tracing::warn;

use crate::error::IngestError;

/// The granularity at which failures are isolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Type,
    Subject,
    Ability,
    Move,
    Encounters,
    Sprite,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Type => "type",
            UnitKind::Subject => "pokemon",
            UnitKind::Ability => "ability",
            UnitKind::Move => "move",
            UnitKind::Encounters => "encounters",
            UnitKind::Sprite => "sprite",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub kind: UnitKind,
    pub subject: Option<i64>,
    pub key: String,
    pub outcome: Outcome,
}

impl UnitReport {
    pub fn is_done(&self) -> bool {
        self.outcome == Outcome::Done
    }
}

/// Per-unit outcomes of one run, in processing order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    units: Vec<UnitReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one unit, logging skips with enough context to
    /// retry the unit by hand. Returns whether the unit succeeded.
    pub fn record(
        &mut self,
        kind: UnitKind,
        subject: Option<i64>,
        key: &str,
        result: Result<(), IngestError>,
    ) -> bool {
        let outcome = match result {
            Ok(()) => Outcome::Done,
            Err(err) => {
                warn!(subject, kind = %kind, key, error = %err, "skipped");
                Outcome::Skipped {
                    reason: err.to_string(),
                }
            }
        };
        let done = outcome == Outcome::Done;
        self.units.push(UnitReport {
            kind,
            subject,
            key: key.to_string(),
            outcome,
        });
        done
    }

    pub fn units(&self) -> &[UnitReport] {
        &self.units
    }

    pub fn done(&self, kind: UnitKind) -> usize {
        self.units
            .iter()
            .filter(|u| u.kind == kind && u.is_done())
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| !u.is_done())
    }

    pub fn skipped_of(&self, kind: UnitKind) -> usize {
        self.skipped().filter(|u| u.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    /// One-line banner for the end of a run
    pub fn summary(&self, kind: UnitKind) -> String {
        let done = self.done(kind);
        let skipped = self.skipped_of(kind);
        let other = self.skipped().count() - skipped;
        let mut line = format!("{} {} done, {} skipped", done, kind, skipped);
        if other > 0 {
            line.push_str(&format!(" ({} sub-resources skipped)", other));
        }
        line
    }
}
