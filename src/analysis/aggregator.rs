//! Counting primitives and the count-based aggregations.
//!
//! Affiliation, occurrence and principal-type counts all follow the same
//! shape: extract keys from every report, tally them (once per report or
//! once per occurrence), then optionally normalize by the grand total.

use crate::analysis::classifier::{classify, PrincipalType, RequestType};
use crate::error::{AnalysisError, Result};
use crate::models::{CountMode, ListField, Person, Report, RoleField};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// How often a key may be counted for a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Each distinct key counts at most once per report.
    PerRecord,
    /// Every occurrence counts, duplicates included.
    EveryOccurrence,
}

/// Row order of a finished count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Highest count first; ties keep first-appearance order.
    Descending,
    /// Keys in the order they were first seen (or seeded).
    Insertion,
}

/// Running counts keyed by `K`, in first-appearance order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    rows: Vec<(K, usize)>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Creates a tally with every key in `keys` present at zero.
    pub fn with_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let mut tally = Self::new();
        for key in keys {
            if !tally.positions.contains_key(&key) {
                tally.positions.insert(key.clone(), tally.rows.len());
                tally.rows.push((key, 0));
            }
        }
        tally
    }

    /// Increments the count of `key` by one.
    pub fn add(&mut self, key: K) {
        match self.positions.get(&key) {
            Some(&index) => self.rows[index].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.rows.len());
                self.rows.push((key, 1));
            }
        }
    }

    /// Counts the keys `extract` yields for every report.
    pub fn record_all<'a, I, F, L>(mut self, records: I, policy: DedupPolicy, mut extract: F) -> Self
    where
        I: IntoIterator<Item = &'a Report>,
        F: FnMut(&'a Report) -> L,
        L: IntoIterator<Item = K>,
    {
        for record in records {
            match policy {
                DedupPolicy::EveryOccurrence => {
                    for key in extract(record) {
                        self.add(key);
                    }
                }
                DedupPolicy::PerRecord => {
                    let mut seen = HashSet::new();
                    for key in extract(record) {
                        if seen.insert(key.clone()) {
                            self.add(key);
                        }
                    }
                }
            }
        }
        self
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    /// Finishes the tally as a count table.
    ///
    /// Relative tables need a non-zero total and fail with
    /// [`AnalysisError::EmptyInput`] otherwise.
    pub fn into_table(self, mode: CountMode, order: RowOrder) -> Result<CountTable<K>> {
        let total = self.total();
        if mode == CountMode::Relative && total == 0 {
            return Err(AnalysisError::EmptyInput {
                operation: "relative counts",
            });
        }

        let mut rows = self.rows;
        if order == RowOrder::Descending {
            // Stable, so equal counts keep first-appearance order.
            rows.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        }

        Ok(CountTable { mode, total, rows })
    }
}

/// Convenience wrapper: a fresh [`Tally`] over `records`.
pub fn tally<'a, K, I, F, L>(records: I, policy: DedupPolicy, extract: F) -> Tally<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a Report>,
    F: FnMut(&'a Report) -> L,
    L: IntoIterator<Item = K>,
{
    Tally::new().record_all(records, policy, extract)
}

/// Ordered label counts, expressed absolutely or relative to their total.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable<K> {
    mode: CountMode,
    total: usize,
    rows: Vec<(K, usize)>,
}

impl<K: Eq> CountTable<K> {
    pub fn mode(&self) -> CountMode {
        self.mode
    }

    /// Sum of the raw counts.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw count of `key`.
    pub fn count<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.rows
            .iter()
            .find(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, count)| *count)
    }

    /// Value of `key` in the table's mode.
    pub fn value<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.count(key).map(|count| self.scale(count))
    }

    /// Rows as `(key, value)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.rows.iter().map(|(key, count)| (key, self.scale(*count)))
    }

    /// Rows as `(key, raw count)` in table order.
    pub fn counts(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.rows.iter().map(|(key, count)| (key, *count))
    }

    /// Sum of the values: the total in absolute mode, 1.0 in relative mode.
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, value)| value).sum()
    }

    fn scale(&self, count: usize) -> f64 {
        match self.mode {
            CountMode::Absolute => count as f64,
            CountMode::Relative => count as f64 / self.total as f64,
        }
    }
}

impl<K: Eq + fmt::Display> Serialize for CountTable<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Entry {
            label: String,
            count: usize,
            value: f64,
        }

        let entries: Vec<Entry> = self
            .rows
            .iter()
            .map(|(key, count)| Entry {
                label: key.to_string(),
                count: *count,
                value: self.scale(*count),
            })
            .collect();

        let mut state = serializer.serialize_struct("CountTable", 3)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

fn role_persons(
    report: &Report,
    role: RoleField,
    extra_role: Option<RoleField>,
) -> impl Iterator<Item = &Person> {
    let extra = extra_role.map_or(&[][..], |r| report.persons(r));
    report.persons(role).iter().chain(extra.iter())
}

/// Counts reports per affiliation across `role` (and `extra_role`).
///
/// A report staffed by several people from the same center counts once
/// for that center.
pub fn count_affiliations<'a, I>(
    records: I,
    role: RoleField,
    extra_role: Option<RoleField>,
    mode: CountMode,
) -> Result<CountTable<String>>
where
    I: IntoIterator<Item = &'a Report>,
{
    tally(records, DedupPolicy::PerRecord, |report| {
        role_persons(report, role, extra_role).map(|p| p.affiliation.clone())
    })
    .into_table(mode, RowOrder::Descending)
}

/// Distinct person names per affiliation across `role` (and `extra_role`).
pub fn affiliation_members<'a, I>(
    records: I,
    role: RoleField,
    extra_role: Option<RoleField>,
) -> BTreeMap<String, BTreeSet<String>>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for report in records {
        for person in role_persons(report, role, extra_role) {
            members
                .entry(person.affiliation.clone())
                .or_default()
                .insert(person.name.clone());
        }
    }
    members
}

/// Catalog spelling of a request-type label. Unknown labels stay as written.
fn canonical_request_type(label: &str) -> String {
    RequestType::from_label(label).map_or_else(|| label.to_string(), |t| t.label().to_string())
}

/// Counts every occurrence of each label in the list-valued `field`.
///
/// Request types are counted under their catalog spelling, so "Code Audit"
/// and "Code audit" share one row.
pub fn count_occurrences<'a, I>(records: I, field: ListField, mode: CountMode) -> Result<CountTable<String>>
where
    I: IntoIterator<Item = &'a Report>,
{
    tally(records, DedupPolicy::EveryOccurrence, |report| {
        report.labels(field).iter().map(move |label| match field {
            ListField::RequestTypes => canonical_request_type(label),
            _ => label.clone(),
        })
    })
    .into_table(mode, RowOrder::Descending)
}

/// Collects `records`, failing on the first report without request types.
///
/// Such a report has no principal category and would silently drop out of
/// every category-based aggregation.
pub(crate) fn with_request_types<'a, I>(records: I) -> Result<Vec<&'a Report>>
where
    I: IntoIterator<Item = &'a Report>,
{
    records
        .into_iter()
        .map(|report| {
            if report.request_types.is_empty() {
                Err(AnalysisError::InvalidRecord {
                    ticket: report.ticket_number,
                    reason: "no request types",
                })
            } else {
                Ok(report)
            }
        })
        .collect()
}

/// Counts reports per principal category of their request types.
///
/// All three categories are always present, in the order SE, LEGAL, PRAC.
/// A report without request types fails with [`AnalysisError::InvalidRecord`].
pub fn count_principal_types<'a, I>(records: I, mode: CountMode) -> Result<CountTable<PrincipalType>>
where
    I: IntoIterator<Item = &'a Report>,
{
    let records = with_request_types(records)?;
    Tally::with_keys(PrincipalType::ALL)
        .record_all(records, DedupPolicy::PerRecord, |report| {
            report.request_types.iter().map(|label| classify(label))
        })
        .into_table(mode, RowOrder::Insertion)
}

/// Consultant affiliations of the reports that carry `request_type`.
pub fn count_affiliations_for_request_type<'a, I>(
    records: I,
    request_type: &str,
    mode: CountMode,
) -> Result<CountTable<String>>
where
    I: IntoIterator<Item = &'a Report>,
{
    let matching = records.into_iter().filter(|report| {
        report
            .request_types
            .iter()
            .any(|label| label.eq_ignore_ascii_case(request_type))
    });
    count_affiliations(matching, RoleField::Consultants, None, mode)
}
