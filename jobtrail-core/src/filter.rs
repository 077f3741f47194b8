//! Per-field search over application lists, and company tallies

use crate::record::ApplicationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// One optional search term per field.
///
/// Empty and absent terms don't filter anything. A record matches when it
/// satisfies every non-empty term.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchTerms {
    /// Substring of the date, case-insensitive
    pub date: Option<String>,
    /// Substring of the company, case-insensitive
    pub company: Option<String>,
    /// Substring of the position, case-insensitive
    pub position: Option<String>,
    /// Substring of the literal status value (`answered`, `no-answer`,
    /// `rejected`), case-sensitive
    pub status: Option<String>,
    /// Substring of the remarks, case-insensitive
    pub remarks: Option<String>,
}

impl SearchTerms {
    /// Whether no term would filter anything.
    pub fn is_empty(&self) -> bool {
        [
            &self.date,
            &self.company,
            &self.position,
            &self.status,
            &self.remarks,
        ]
        .into_iter()
        .all(|term| term.as_deref().map_or(true, str::is_empty))
    }

    /// Whether `record` satisfies every non-empty term.
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        contains_ignore_case(&record.date, self.date.as_deref())
            && contains_ignore_case(&record.company, self.company.as_deref())
            && contains_ignore_case(&record.position, self.position.as_deref())
            && contains_literal(record.status.as_str(), self.status.as_deref())
            && contains_ignore_case(&record.remarks, self.remarks.as_deref())
    }
}

/// Narrow `records` down to those matching `terms`, keeping their order.
pub fn filter(records: &[ApplicationRecord], terms: &SearchTerms) -> Vec<ApplicationRecord> {
    records
        .iter()
        .filter(|record| terms.matches(record))
        .cloned()
        .collect()
}

/// Like [`filter`], for a list the caller already owns.
pub fn filter_owned(records: Vec<ApplicationRecord>, terms: &SearchTerms) -> Vec<ApplicationRecord> {
    if terms.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| terms.matches(record))
        .collect()
}

/// How many applications went to each company.
///
/// Company names are lowercased and trimmed before counting; records without
/// a company are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyCounts {
    /// Count per normalized company name
    pub counts: BTreeMap<String, usize>,
}

impl CompanyCounts {
    /// Tally the companies in `records`.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a ApplicationRecord>) -> Self {
        let mut counts = BTreeMap::new();
        for record in records {
            let company = record.company.trim().to_lowercase();
            if !company.is_empty() {
                *counts.entry(company).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// How many applications went to `company`, matched the way it was tallied.
    pub fn get(&self, company: &str) -> usize {
        self.counts
            .get(&company.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

fn contains_ignore_case(field: &str, term: Option<&str>) -> bool {
    match term {
        None | Some("") => true,
        Some(term) => field.to_lowercase().contains(&term.to_lowercase()),
    }
}

fn contains_literal(field: &str, term: Option<&str>) -> bool {
    match term {
        None | Some("") => true,
        Some(term) => field.contains(term),
    }
}
