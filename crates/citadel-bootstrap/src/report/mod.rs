//! # Run Report
//!
//! Append-only audit trail of a run. Every deploy, setup call and grant adds exactly one
//! entry; a failed run ends with the entry naming the failing step, its target and the
//! cause. [`RunReport::finalize`] freezes the trail into a [`RunSummary`] that can be
//! printed or written out as JSON.

use crate::error::BootstrapError;
use chrono::{DateTime, Utc};
use component_framework::Address;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Failed {
        cause: String,
        #[serde(skip)]
        error: BootstrapError,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Position in the report; assigned on append.
    pub index: usize,
    pub description: String,
    /// Component the step acted on.
    pub target: Option<String>,
    pub outcome: Outcome,
    /// Address the step produced or touched.
    pub address: Option<Address>,
    pub timestamp: DateTime<Utc>,
}

impl ReportEntry {
    pub fn success(description: impl Into<String>, target: Option<&str>, address: Option<Address>) -> Self {
        Self {
            index: 0,
            description: description.into(),
            target: target.map(str::to_string),
            outcome: Outcome::Success { note: None },
            address,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(description: impl Into<String>, target: Option<&str>, error: BootstrapError) -> Self {
        Self {
            index: 0,
            description: description.into(),
            target: target.map(str::to_string),
            outcome: Outcome::Failed {
                cause: error.to_string(),
                error,
            },
            address: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches a note to a successful entry (`already held`, `disabled`, …).
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        if let Outcome::Success { note: slot } = &mut self.outcome {
            *slot = Some(note.into());
        }
        self
    }

    pub fn note(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { note } => note.as_deref(),
            Outcome::Failed { .. } => None,
        }
    }
}

/// The in-progress report of one run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, mut entry: ReportEntry) {
        entry.index = self.entries.len();
        self.entries.push(entry);
    }

    /// Appends every entry of `other`, renumbering them.
    pub fn extend(&mut self, other: RunReport) {
        for entry in other.entries {
            self.append(entry);
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The error of the run's final entry, if the run failed.
    pub fn failure(&self) -> Option<&BootstrapError> {
        match self.entries.last().map(|entry| &entry.outcome) {
            Some(Outcome::Failed { error, .. }) => Some(error),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// Freezes the report.
    pub fn finalize(self) -> RunSummary {
        RunSummary {
            success: self.is_success(),
            finished_at: Utc::now(),
            entries: self.entries,
            manifest: BTreeMap::new(),
        }
    }

    /// Freezes a report whose run was rejected before its first step.
    pub fn finalize_rejected(self) -> RunSummary {
        RunSummary {
            success: false,
            ..self.finalize()
        }
    }
}

/// Read-only result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub success: bool,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
    /// Name to address map of every registered component.
    pub manifest: BTreeMap<String, Address>,
}

impl RunSummary {
    pub fn with_manifest(mut self, manifest: BTreeMap<String, Address>) -> Self {
        self.manifest = manifest;
        self
    }

    /// The final entry, which names the failing step when the run failed.
    pub fn last(&self) -> Option<&ReportEntry> {
        self.entries.last()
    }

    pub fn failure(&self) -> Option<&BootstrapError> {
        match self.last().map(|entry| &entry.outcome) {
            Some(Outcome::Failed { error, .. }) => Some(error),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "[{:>3}] ", entry.index)?;
            match &entry.outcome {
                Outcome::Success { note } => {
                    write!(f, "ok     {}", entry.description)?;
                    if let Some(address) = entry.address {
                        write!(f, " @ {address}")?;
                    }
                    if let Some(note) = note {
                        write!(f, " ({note})")?;
                    }
                }
                Outcome::Failed { cause, .. } => {
                    write!(f, "FAILED {}", entry.description)?;
                    if let Some(target) = &entry.target {
                        write!(f, " [{target}]")?;
                    }
                    write!(f, ": {cause}")?;
                }
            }
            writeln!(f)?;
        }
        let status = if self.success { "succeeded" } else { "failed" };
        write!(f, "run {status} after {} steps", self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_numbers_entries() {
        let mut report = RunReport::new();
        report.append(ReportEntry::success("deploy gac", Some("gac"), Some(Address::derive("gac"))));
        report.append(ReportEntry::success("initialize gac", Some("gac"), None));
        assert_eq!(report.len(), 2);
        assert_eq!(report.entries()[1].index, 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_failure_is_final_entry() {
        let mut report = RunReport::new();
        report.append(ReportEntry::success("initialize gac", Some("gac"), None));
        let error = BootstrapError::UnknownComponent("vester".into());
        report.append(ReportEntry::failure("initialize xCitadel", Some("xCitadel"), error.clone()));

        assert_eq!(report.failure(), Some(&error));
        let summary = report.finalize();
        assert!(!summary.success);
        assert_eq!(summary.failure(), Some(&error));
        let text = summary.to_string();
        assert!(text.contains("FAILED initialize xCitadel [xCitadel]: unknown component: vester"));
        assert!(text.ends_with("run failed after 2 steps"));
    }

    #[test]
    fn test_extend_renumbers() {
        let mut first = RunReport::new();
        first.append(ReportEntry::success("deploy gac", Some("gac"), None));
        let mut second = RunReport::new();
        second.append(ReportEntry::success("grant KEEPER to keeper", Some("gac"), None).with_note("already held"));

        first.extend(second);
        assert_eq!(first.entries()[1].index, 1);
        assert_eq!(first.entries()[1].note(), Some("already held"));
    }

    #[test]
    fn test_summary_json() {
        let mut report = RunReport::new();
        let address = Address::derive("gac");
        report.append(ReportEntry::success("deploy gac", Some("gac"), Some(address)));
        report.append(ReportEntry::failure(
            "initialize gac",
            Some("gac"),
            BootstrapError::AlreadyInitialized { component: "gac".into() },
        ));
        let summary = report
            .finalize()
            .with_manifest(BTreeMap::from([("gac".to_string(), address)]));

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["entries"][0]["outcome"]["status"], "success");
        assert_eq!(json["entries"][0]["address"], address.to_string());
        assert_eq!(json["entries"][1]["outcome"]["status"], "failed");
        assert_eq!(json["entries"][1]["outcome"]["cause"], "gac is already initialized");
        assert!(json["entries"][1]["outcome"].get("error").is_none());
        assert_eq!(json["manifest"]["gac"], address.to_string());
    }
}
