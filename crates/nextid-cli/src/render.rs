//! Report rendering for the terminal

use nextid_core::{AllocationReport, Identifier, IdentifierSet, ReportStatus};
use serde::Serialize;
use std::fmt;

/// Plain-text view of an [`AllocationReport`]
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a>(pub &'a AllocationReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let status = match report.status {
            ReportStatus::Success => "success",
            ReportStatus::Degraded => "degraded",
            ReportStatus::Error => "error",
        };
        writeln!(f, "Status:          {status}")?;

        let Some(next_id) = report.next_id else {
            if let Some(message) = &report.message {
                writeln!(f, "Error:           {message}")?;
            }
            return Ok(());
        };

        writeln!(f, "Next ID:         {} ({next_id})", report.formatted_id)?;
        writeln!(
            f,
            "Baseline:        {} ids, max {}",
            report.baseline_count, report.baseline_max_id
        )?;
        writeln!(
            f,
            "Max used:        {} ({} ids in use)",
            report.max_used_id, report.all_used_ids_count
        )?;
        writeln!(f, "Open PRs:        {}", report.total_open_proposals)?;

        if !report.proposals_with_new_ids.is_empty() {
            writeln!(f)?;
            writeln!(f, "PRs introducing ids:")?;
            for entry in &report.proposals_with_new_ids {
                writeln!(
                    f,
                    "  #{} {}: {}",
                    entry.proposal_number,
                    entry.proposal_title,
                    join(entry.new_ids.iter())
                )?;
            }
        }

        if !report.collisions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Collisions:")?;
            for collision in &report.collisions {
                let numbers: Vec<String> = collision
                    .proposal_numbers
                    .iter()
                    .map(|n| format!("#{n}"))
                    .collect();
                writeln!(f, "  {} in {}", collision.id, numbers.join(", "))?;
            }
        }

        if let Some(message) = &report.message {
            writeln!(f)?;
            writeln!(f, "Note: {message}")?;
        }
        Ok(())
    }
}

/// Identifiers found in a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// Number of identifiers
    pub count: usize,
    /// Smallest identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Identifier>,
    /// Largest identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Identifier>,
    /// Identifiers, ascending
    pub ids: Vec<Identifier>,
}

impl From<&IdentifierSet> for ParseSummary {
    fn from(ids: &IdentifierSet) -> Self {
        Self {
            count: ids.len(),
            min: ids.min(),
            max: ids.max(),
            ids: ids.to_vec(),
        }
    }
}

impl fmt::Display for ParseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                writeln!(f, "{} identifiers ({min}..={max})", self.count)?;
                writeln!(f, "{}", join(self.ids.iter()))
            }
            _ => writeln!(f, "no identifiers"),
        }
    }
}

fn join<'a>(ids: impl Iterator<Item = &'a Identifier>) -> String {
    ids.map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextid_core::{CollisionEntry, ProposalEntry};
    use pretty_assertions::assert_eq;

    fn success() -> AllocationReport {
        AllocationReport {
            status: ReportStatus::Success,
            next_id: Some(2161),
            baseline_max_id: 2159,
            max_used_id: 2160,
            total_open_proposals: 3,
            proposals_with_new_ids: vec![
                ProposalEntry {
                    proposal_number: 4,
                    proposal_title: "Add rule".into(),
                    new_ids: vec![2160],
                },
                ProposalEntry {
                    proposal_number: 7,
                    proposal_title: "Another rule".into(),
                    new_ids: vec![2160],
                },
            ],
            formatted_id: "PH2161".into(),
            all_used_ids_count: 3,
            baseline_count: 2,
            collisions: vec![CollisionEntry {
                id: 2160,
                proposal_numbers: vec![4, 7],
            }],
            message: None,
        }
    }

    #[test]
    fn renders_success() {
        let text = TextReport(&success()).to_string();
        assert_eq!(
            text,
            "Status:          success\n\
             Next ID:         PH2161 (2161)\n\
             Baseline:        2 ids, max 2159\n\
             Max used:        2160 (3 ids in use)\n\
             Open PRs:        3\n\
             \n\
             PRs introducing ids:\n  \
             #4 Add rule: 2160\n  \
             #7 Another rule: 2160\n\
             \n\
             Collisions:\n  \
             2160 in #4, #7\n"
        );
    }

    #[test]
    fn renders_degraded_note() {
        let mut report = success();
        report.status = ReportStatus::Degraded;
        report.message = Some("proposal listing failed".into());

        let text = TextReport(&report).to_string();
        assert!(text.starts_with("Status:          degraded\n"));
        assert!(text.ends_with("Note: proposal listing failed\n"));
    }

    #[test]
    fn renders_error_without_numbers() {
        let report = AllocationReport {
            status: ReportStatus::Error,
            next_id: None,
            baseline_max_id: 0,
            max_used_id: 0,
            total_open_proposals: 0,
            proposals_with_new_ids: Vec::new(),
            formatted_id: String::new(),
            all_used_ids_count: 0,
            baseline_count: 0,
            collisions: Vec::new(),
            message: Some("baseline artifact not found".into()),
        };

        assert_eq!(
            TextReport(&report).to_string(),
            "Status:          error\nError:           baseline artifact not found\n"
        );
    }

    #[test]
    fn parse_summary_json() {
        let summary = ParseSummary::from(&IdentifierSet::from([2000, 2005]));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"count": 2, "min": 2000, "max": 2005, "ids": [2000, 2005]})
        );
        assert_eq!(summary.to_string(), "2 identifiers (2000..=2005)\n2000, 2005\n");
    }

    #[test]
    fn empty_parse_summary() {
        let summary = ParseSummary::from(&IdentifierSet::new());
        assert_eq!(summary.to_string(), "no identifiers\n");
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({"count": 0, "ids": []})
        );
    }
}
