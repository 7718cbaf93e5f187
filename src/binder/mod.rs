//! Configuration binder
//!
//! Walks a type's field registration table against an ordered list of flat
//! [`PropertySource`]s and produces the typed value. Later sources override
//! earlier ones; mapping fields accumulate sub-keys across all sources.
//! The binder performs no I/O.

pub mod coerce;
pub mod relaxed;

use crate::models::PropertySource;
use crate::types::{AppError, BoundFields, BoundValue, FieldSpec, Result, ValueKind};
use relaxed::PathSegment;
use std::collections::BTreeMap;

/// A type that can be populated from a field registration table
pub trait Bindable: Default + Sized {
    /// Namespace the type binds from when no prefix is configured
    const PREFIX: &'static str;

    /// Declared fields
    fn fields() -> &'static [FieldSpec];

    /// Store one coerced field value
    fn apply(&mut self, field: &'static str, value: BoundValue) -> Result<()>;

    /// Build a value from its bound fields, starting from the zero value
    fn from_bound(fields: BoundFields) -> Result<Self> {
        let mut target = Self::default();
        for (field, value) in fields {
            target.apply(field, value)?;
        }
        Ok(target)
    }
}

/// Binding behaviour switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Namespace override; `None` uses the target type's prefix
    pub prefix: Option<String>,
    /// Fail on a single value given for a mapping, sequence or nested field
    pub strict_nested: bool,
    /// Skip keys under the prefix that match no declared field
    pub ignore_unknown_fields: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            strict_nested: false,
            ignore_unknown_fields: true,
        }
    }
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn strict_nested(mut self, strict: bool) -> Self {
        self.strict_nested = strict;
        self
    }

    pub fn ignore_unknown_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_fields = ignore;
        self
    }
}

/// A bound value together with what the binder matched and ignored
#[derive(Debug, Clone, PartialEq)]
pub struct BindOutcome<T> {
    pub record: T,
    /// Keys that matched a declared field (including overridden ones)
    pub matched_keys: usize,
    /// Keys left out because they carried a flat value for a compound field
    pub skipped: Vec<String>,
    /// Keys under the prefix that matched no declared field
    pub unknown: Vec<String>,
}

/// One source entry under the bound prefix
#[derive(Debug)]
struct Candidate<'a> {
    source: usize,
    key: &'a str,
    value: &'a str,
    rest: Vec<PathSegment>,
}

impl Candidate<'_> {
    fn descend(&self) -> Self {
        Candidate {
            source: self.source,
            key: self.key,
            value: self.value,
            rest: self.rest[1..].to_vec(),
        }
    }
}

#[derive(Debug, Default)]
struct Report {
    matched: usize,
    skipped: Vec<String>,
    unknown: Vec<String>,
}

/// Stateless binder; one instance may bind any number of source lists
#[derive(Debug, Clone, Default)]
pub struct Binder {
    options: BindOptions,
}

impl Binder {
    pub fn new(options: BindOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Bind `T` from `sources`, lowest precedence first
    pub fn bind<T: Bindable>(&self, sources: &[PropertySource]) -> Result<T> {
        self.bind_with_report(sources).map(|outcome| outcome.record)
    }

    /// Bind `T` and report matched, skipped and unknown keys
    pub fn bind_with_report<T: Bindable>(&self, sources: &[PropertySource]) -> Result<BindOutcome<T>> {
        let prefix = self.options.prefix.as_deref().unwrap_or(T::PREFIX);
        let prefix_path = relaxed::parse_path(prefix);

        let mut candidates = Vec::new();
        for (index, source) in sources.iter().enumerate() {
            for (key, value) in source.iter() {
                let path = relaxed::parse_path(key);
                if let Some(rest) = relaxed::strip_prefix(&path, &prefix_path) {
                    if !rest.is_empty() {
                        candidates.push(Candidate {
                            source: index,
                            key,
                            value,
                            rest: rest.to_vec(),
                        });
                    }
                }
            }
        }

        let mut report = Report::default();
        let fields = self.bind_fields(prefix, T::fields(), &candidates, &mut report)?;

        if !self.options.ignore_unknown_fields {
            if let Some(key) = report.unknown.first() {
                return Err(AppError::unknown_property(key.clone()));
            }
        }

        Ok(BindOutcome {
            record: T::from_bound(fields)?,
            matched_keys: report.matched,
            skipped: report.skipped,
            unknown: report.unknown,
        })
    }

    fn bind_fields(
        &self,
        path: &str,
        specs: &'static [FieldSpec],
        candidates: &[Candidate<'_>],
        report: &mut Report,
    ) -> Result<BoundFields> {
        let mut bound = BoundFields::new();
        let mut claimed = vec![false; candidates.len()];

        for spec in specs {
            let matching: Vec<&Candidate<'_>> = candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| {
                    candidate.rest[0]
                        .as_name()
                        .map(|name| spec.names().any(|declared| relaxed::matches(declared, name)))
                        .unwrap_or(false)
                })
                .map(|(index, candidate)| {
                    claimed[index] = true;
                    candidate
                })
                .collect();
            report.matched += matching.len();

            let matching = if spec.kind.is_compound() {
                self.flat_filtered(&matching, report)?
            } else {
                matching
            };

            let value = match spec.kind {
                ValueKind::Mapping => self.bind_mapping(&matching, report),
                ValueKind::Sequence => self.bind_sequence(&matching, report)?,
                ValueKind::Nested(nested) => {
                    let descended: Vec<Candidate<'_>> = matching.iter().map(|c| c.descend()).collect();
                    let nested_path = format!("{}.{}", path, spec.name);
                    let matched_before = report.matched;
                    let fields = self.bind_fields(&nested_path, nested, &descended, report)?;
                    // Present only when a source key reached one of its fields; defaults alone do not count
                    (report.matched > matched_before).then_some(BoundValue::Nested(fields))
                }
                kind => {
                    let mut winner = None;
                    for candidate in &matching {
                        if candidate.rest.len() == 1 {
                            winner = Some(*candidate);
                        } else {
                            report.unknown.push(candidate.key.to_string());
                        }
                    }
                    match (winner, spec.default) {
                        (Some(candidate), _) => Some(coerce::coerce(kind, candidate.key, candidate.value)?),
                        (None, Some(default)) => {
                            let key = format!("{}.{}", path, spec.name);
                            Some(coerce::coerce(kind, &key, default)?)
                        }
                        (None, None) => None,
                    }
                }
            };

            if let Some(value) = value {
                bound.insert(spec.name, value);
            }
        }

        for (candidate, claimed) in candidates.iter().zip(claimed) {
            if !claimed {
                report.unknown.push(candidate.key.to_string());
            }
        }

        Ok(bound)
    }

    /// Drop (or reject, in strict mode) single values given for a compound field
    fn flat_filtered<'c, 'a>(
        &self,
        matching: &[&'c Candidate<'a>],
        report: &mut Report,
    ) -> Result<Vec<&'c Candidate<'a>>> {
        let mut nested = Vec::with_capacity(matching.len());
        for candidate in matching {
            if candidate.rest.len() == 1 {
                if self.options.strict_nested {
                    return Err(AppError::unsupported_nested(candidate.key));
                }
                report.skipped.push(candidate.key.to_string());
            } else {
                nested.push(*candidate);
            }
        }
        Ok(nested)
    }

    fn bind_mapping(&self, matching: &[&Candidate<'_>], report: &mut Report) -> Option<BoundValue> {
        let mut map = BTreeMap::new();
        for candidate in matching {
            let sub_key = relaxed::render_sub_key(&candidate.rest[1..]);
            if sub_key.is_empty() {
                report.unknown.push(candidate.key.to_string());
                continue;
            }
            // Candidates arrive in precedence order, so later sub-keys overwrite
            map.insert(sub_key, candidate.value.to_string());
        }
        (!map.is_empty()).then_some(BoundValue::Mapping(map))
    }

    fn bind_sequence(&self, matching: &[&Candidate<'_>], report: &mut Report) -> Result<Option<BoundValue>> {
        let mut indexed = Vec::new();
        for &candidate in matching {
            match candidate.rest.as_slice() {
                [_, PathSegment::Index(index)] => indexed.push((*index, candidate)),
                _ => report.unknown.push(candidate.key.to_string()),
            }
        }

        // The highest-precedence source with any element defines the whole list
        let Some(winning_source) = indexed.iter().map(|(_, c)| c.source).max() else {
            return Ok(None);
        };

        let mut elements: BTreeMap<usize, &Candidate<'_>> = BTreeMap::new();
        for (index, candidate) in indexed {
            if candidate.source == winning_source {
                elements.insert(index, candidate);
            }
        }

        let mut values = Vec::with_capacity(elements.len());
        for (position, (index, candidate)) in elements.into_iter().enumerate() {
            if index != position {
                return Err(AppError::bind(candidate.key, "contiguous sequence index", candidate.value));
            }
            values.push(candidate.value.to_string());
        }
        Ok(Some(BoundValue::Sequence(values)))
    }
}
