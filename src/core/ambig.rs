//! Ambiguity cases and their resolution policy
//!
//! Every geometric or bookkeeping oddity an input record can exhibit is one
//! of nine cases; each case carries a configured action and a hit counter.
//! Resolution is a value (`Decision`), never control flow, except for the
//! Abort action which fails the whole ingestion.

use std::io::{self, Write};

use super::chrom::ChromScope;
use super::error::{BedsiftError, LineContext, Result};
use super::items::Region;

/// Ambiguity case raised by a record during ingestion or extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbigCase {
    /// Identical position to the previous item
    Duplicate,
    /// Overlaps the previous item without containment
    Crossed,
    /// Starts exactly where the previous item ends
    Adjacent,
    /// One of the pair contains the other
    Covered,
    /// Shorter than the configured minimum feature length
    TooShort,
    /// Length differs from the established read length
    DifferentSize,
    /// Score at or below the configured minimum
    FilteredByScore,
    /// End beyond the known chromosome length
    ExceedsChromLen,
    /// Unrecognized chromosome name (reconciled, never dispatched)
    NegligibleChrom,
}

impl AmbigCase {
    pub const COUNT: usize = 9;

    pub const ALL: [AmbigCase; Self::COUNT] = [
        AmbigCase::Duplicate,
        AmbigCase::Crossed,
        AmbigCase::Adjacent,
        AmbigCase::Covered,
        AmbigCase::TooShort,
        AmbigCase::DifferentSize,
        AmbigCase::FilteredByScore,
        AmbigCase::ExceedsChromLen,
        AmbigCase::NegligibleChrom,
    ];

    fn idx(self) -> usize {
        match self {
            AmbigCase::Duplicate => 0,
            AmbigCase::Crossed => 1,
            AmbigCase::Adjacent => 2,
            AmbigCase::Covered => 3,
            AmbigCase::TooShort => 4,
            AmbigCase::DifferentSize => 5,
            AmbigCase::FilteredByScore => 6,
            AmbigCase::ExceedsChromLen => 7,
            AmbigCase::NegligibleChrom => 8,
        }
    }

    /// Phrase used in alarms and the statistics block
    pub fn label(self) -> &'static str {
        match self {
            AmbigCase::Duplicate => "duplicated",
            AmbigCase::Crossed => "crossed",
            AmbigCase::Adjacent => "adjacent",
            AmbigCase::Covered => "covered",
            AmbigCase::TooShort => "too short",
            AmbigCase::DifferentSize => "different size of",
            AmbigCase::FilteredByScore => "filtered by score",
            AmbigCase::ExceedsChromLen => "position exceeding chromosome length of",
            AmbigCase::NegligibleChrom => "negligible chromosome",
        }
    }
}

/// Configured response to an ambiguity case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep the record as-is
    Accept,
    /// Resolve in place (merge for geometric cases), with an alarm
    Handle,
    /// Drop the record, with an alarm
    Omit,
    /// Drop the record silently
    OmitSilent,
    /// Fail the whole ingestion
    Abort,
}

impl Action {
    fn outcome_label(self) -> &'static str {
        match self {
            Action::Accept => "accepted",
            Action::Handle => "joined",
            Action::Omit | Action::OmitSilent => "omitted",
            Action::Abort => "aborted",
        }
    }
}

/// What the caller should do with the offending record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep it
    Accept,
    /// Fold it into the previous item
    Merge,
    /// Drop it
    Reject,
}

/// Kind of item a store holds, for alarm and statistics wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Feature,
    Read,
}

impl EntityKind {
    pub fn name(self, plural: bool) -> &'static str {
        match (self, plural) {
            (EntityKind::Feature, false) => "feature",
            (EntityKind::Feature, true) => "features",
            (EntityKind::Read, false) => "read",
            (EntityKind::Read, true) => "reads",
        }
    }
}

/// Destination for per-line alarms. Production uses stderr; tests inject
/// a collector.
pub trait AlarmSink {
    /// One blank separator line before the first alarm of a session
    fn leading_gap(&mut self) {}
    fn alarm(&mut self, context: &str, what: &str, outcome: &str);
}

/// Default sink writing alarms to stderr
#[derive(Debug, Default)]
pub struct StderrAlarm;

impl AlarmSink for StderrAlarm {
    fn leading_gap(&mut self) {
        eprintln!();
    }

    fn alarm(&mut self, context: &str, what: &str, outcome: &str) {
        eprintln!("{}: {}; {}", context, what, outcome);
    }
}

#[derive(Debug, Clone, Copy)]
struct CaseSlot {
    action: Action,
    count: u64,
}

/// Per-file ambiguity policy, hit counters and alarm state
pub struct AmbigEngine {
    cases: [CaseSlot; AmbigCase::COUNT],
    kind: EntityKind,
    alarms_on: bool,
    alarm_printed: bool,
    /// Set by ingestion when items within a chromosome arrived unsorted
    pub unsorted_items: bool,
    sink: Box<dyn AlarmSink + Send>,
}

impl AmbigEngine {
    fn with_defaults(kind: EntityKind, alarms_on: bool, defaults: [Action; AmbigCase::COUNT]) -> Self {
        let mut cases = [CaseSlot {
            action: Action::Omit,
            count: 0,
        }; AmbigCase::COUNT];
        for case in AmbigCase::ALL {
            cases[case.idx()].action = defaults[case.idx()];
        }
        Self {
            cases,
            kind,
            alarms_on,
            alarm_printed: false,
            unsorted_items: false,
            sink: Box::new(StderrAlarm),
        }
    }

    /// Default policy for feature lists: merge overlapping and adjacent
    /// features, drop duplicates and contained ones, keep size variation.
    pub fn for_features(alarms_on: bool) -> Self {
        Self::with_defaults(
            EntityKind::Feature,
            alarms_on,
            [
                Action::Omit,       // Duplicate
                Action::Handle,     // Crossed
                Action::Handle,     // Adjacent
                Action::Omit,       // Covered
                Action::Omit,       // TooShort
                Action::Accept,     // DifferentSize
                Action::Omit,       // FilteredByScore
                Action::Omit,       // ExceedsChromLen
                Action::Omit,       // NegligibleChrom
            ],
        )
    }

    /// Default policy for read lists: overlap is normal, size variation
    /// is not.
    pub fn for_reads(alarms_on: bool, accept_duplicates: bool) -> Self {
        let dupl = if accept_duplicates {
            Action::Accept
        } else {
            Action::OmitSilent
        };
        Self::with_defaults(
            EntityKind::Read,
            alarms_on,
            [
                dupl,               // Duplicate
                Action::Accept,     // Crossed
                Action::Accept,     // Adjacent
                Action::Accept,     // Covered
                Action::Accept,     // TooShort
                Action::Omit,       // DifferentSize
                Action::Omit,       // FilteredByScore
                Action::Omit,       // ExceedsChromLen
                Action::Omit,       // NegligibleChrom
            ],
        )
    }

    /// Override the action for one case
    pub fn with_action(mut self, case: AmbigCase, action: Action) -> Self {
        self.cases[case.idx()].action = action;
        self
    }

    /// Replace the alarm sink
    pub fn with_sink(mut self, sink: Box<dyn AlarmSink + Send>) -> Self {
        self.sink = sink;
        self
    }

    pub fn entity(&self) -> EntityKind {
        self.kind
    }

    pub fn action(&self, case: AmbigCase) -> Action {
        self.cases[case.idx()].action
    }

    pub fn count(&self, case: AmbigCase) -> u64 {
        self.cases[case.idx()].count
    }

    /// Count a case hit and resolve it into a decision. Abort is the only
    /// case outcome that propagates as an error.
    pub fn treat_case(&mut self, case: AmbigCase, ctx: &LineContext) -> Result<Decision> {
        let slot = &mut self.cases[case.idx()];
        slot.count += 1;
        let action = slot.action;
        match action {
            Action::Accept => Ok(Decision::Accept),
            Action::Handle => {
                self.print_alarm(case, action, ctx);
                Ok(Decision::Merge)
            }
            Action::Omit => {
                self.print_alarm(case, action, ctx);
                Ok(Decision::Reject)
            }
            Action::OmitSilent => Ok(Decision::Reject),
            Action::Abort => Err(BedsiftError::Aborted {
                context: ctx.owned(),
                message: format!("{} {}", case.label(), self.kind.name(false)),
            }),
        }
    }

    /// Validate raw coordinates and build the region. Negative or inverted
    /// coordinates are always fatal; an end beyond the chromosome length is
    /// dispatched as an ambiguity case.
    pub fn init_region(
        &mut self,
        start: i64,
        end: i64,
        chrom_len: u64,
        ctx: &LineContext,
    ) -> Result<Option<Region>> {
        if start < 0 || end < 0 {
            return Err(BedsiftError::NegativePosition {
                context: ctx.owned(),
            });
        }
        if start >= end {
            return Err(BedsiftError::InvalidRegion {
                context: ctx.owned(),
                start,
                end,
            });
        }
        if chrom_len > 0 && end as u64 > chrom_len {
            if self.treat_case(AmbigCase::ExceedsChromLen, ctx)? == Decision::Reject {
                return Ok(None);
            }
        }
        Ok(Some(Region::new(start as u64, end as u64)))
    }

    fn print_alarm(&mut self, case: AmbigCase, action: Action, ctx: &LineContext) {
        if !self.alarms_on {
            return;
        }
        if !self.alarm_printed {
            self.sink.leading_gap();
            self.alarm_printed = true;
        }
        let what = format!("{} {}", case.label(), self.kind.name(false));
        self.sink.alarm(&ctx.owned(), &what, action.outcome_label());
    }

    /// Sum of every counted case hit
    pub fn ambig_total(&self) -> u64 {
        self.cases.iter().map(|s| s.count).sum()
    }

    /// Reconcile the negligible-chromosome count from the line totals.
    /// Lines that vanished without being counted by any case were on
    /// unrecognized chromosomes; accepted cases were counted but did not
    /// reduce the accepted total, so they are added back.
    pub fn negligible_count(&self, total: u64, accepted: u64) -> u64 {
        let mut counted: u64 = 0;
        let mut accepted_cases: u64 = 0;
        for case in AmbigCase::ALL {
            if case == AmbigCase::NegligibleChrom {
                continue;
            }
            let slot = self.cases[case.idx()];
            counted += slot.count;
            if slot.action == Action::Accept {
                accepted_cases += slot.count;
            }
        }
        total
            .saturating_sub(accepted)
            .saturating_sub(counted)
            .saturating_add(accepted_cases)
    }

    /// Write the statistics block: total and accepted counts, then one
    /// line per case that fired. The negligible count is reconciled from
    /// the totals when the whole file was in scope.
    pub fn report<W: Write>(
        &mut self,
        out: &mut W,
        scope: ChromScope,
        heading: Option<&str>,
        total: u64,
        accepted: u64,
    ) -> io::Result<()> {
        if scope.is_all() {
            self.cases[AmbigCase::NegligibleChrom.idx()].count =
                self.negligible_count(total, accepted);
        }
        let entity = self.kind.name(true);
        let marker = if self.unsorted_items {
            " arisen after sorting"
        } else {
            ""
        };
        if let Some(heading) = heading {
            writeln!(out, "  {}:", heading)?;
        }
        writeln!(out, "  {} total, {} accepted {}", total, accepted, entity)?;
        for case in AmbigCase::ALL {
            if case == AmbigCase::NegligibleChrom && !scope.is_all() {
                continue;
            }
            let slot = self.cases[case.idx()];
            if slot.count == 0 {
                continue;
            }
            writeln!(
                out,
                "    {} ({:.2}%) {} {}{}; {}",
                slot.count,
                percent(slot.count, total),
                case.label(),
                entity,
                marker,
                slot.action.outcome_label()
            )?;
        }
        writeln!(
            out,
            "  total accepted: {} ({:.2}%) {}",
            accepted,
            percent(accepted, total),
            entity
        )?;
        Ok(())
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
