//! Structured key-condition and filter expressions.
//!
//! Queries are assembled from clause lists and a placeholder map instead of
//! string concatenation. A [`QuerySpec`] renders to DynamoDB expression syntax
//! and can also be evaluated against any value implementing [`Attributes`],
//! so the in-memory backend executes exactly the query the DynamoDB backend
//! would send.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::movies::MovieId;

use super::attributes::Attributes;
use super::error::ExpressionError;

/// A value bound to an expression placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    /// An integer (DynamoDB `N`), compared exactly.
    I(i64),
    /// A number (DynamoDB `N`).
    N(f64),
    /// A string (DynamoDB `S`).
    S(String),
}

impl ExprValue {
    fn compare(&self, other: &ExprValue) -> Option<Ordering> {
        match (self, other) {
            (ExprValue::I(a), ExprValue::I(b)) => Some(a.cmp(b)),
            (ExprValue::N(a), ExprValue::N(b)) => a.partial_cmp(b),
            (ExprValue::I(a), ExprValue::N(b)) => (*a as f64).partial_cmp(b),
            (ExprValue::N(a), ExprValue::I(b)) => a.partial_cmp(&(*b as f64)),
            (ExprValue::S(a), ExprValue::S(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<f64> for ExprValue {
    fn from(value: f64) -> Self {
        ExprValue::N(value)
    }
}

impl From<i64> for ExprValue {
    fn from(value: i64) -> Self {
        ExprValue::I(value)
    }
}

impl From<MovieId> for ExprValue {
    fn from(id: MovieId) -> Self {
        ExprValue::I(id.get())
    }
}

impl From<&str> for ExprValue {
    fn from(value: &str) -> Self {
        ExprValue::S(value.to_string())
    }
}

impl From<String> for ExprValue {
    fn from(value: String) -> Self {
        ExprValue::S(value)
    }
}

/// Comparison applied by a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Between,
    BeginsWith,
}

impl Comparator {
    fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Between => "BETWEEN",
            Comparator::BeginsWith => "begins_with",
        }
    }
}

/// The single-operand comparators accepted by [`Clause::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl From<BinaryOp> for Comparator {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Eq => Comparator::Eq,
            BinaryOp::Lt => Comparator::Lt,
            BinaryOp::Le => Comparator::Le,
            BinaryOp::Gt => Comparator::Gt,
            BinaryOp::Ge => Comparator::Ge,
        }
    }
}

/// One condition on one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    attribute: &'static str,
    comparator: Comparator,
    placeholders: Vec<&'static str>,
}

impl Clause {
    /// `attribute <op> placeholder`.
    pub fn compare(attribute: &'static str, op: BinaryOp, placeholder: &'static str) -> Self {
        Self {
            attribute,
            comparator: op.into(),
            placeholders: vec![placeholder],
        }
    }

    pub fn eq(attribute: &'static str, placeholder: &'static str) -> Self {
        Self::compare(attribute, BinaryOp::Eq, placeholder)
    }

    pub fn between(attribute: &'static str, low: &'static str, high: &'static str) -> Self {
        Self {
            attribute,
            comparator: Comparator::Between,
            placeholders: vec![low, high],
        }
    }

    pub fn begins_with(attribute: &'static str, placeholder: &'static str) -> Self {
        Self {
            attribute,
            comparator: Comparator::BeginsWith,
            placeholders: vec![placeholder],
        }
    }

    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn placeholders(&self) -> &[&'static str] {
        &self.placeholders
    }

    fn evaluate<T: Attributes + ?Sized>(
        &self,
        item: &T,
        values: &BTreeMap<&'static str, ExprValue>,
    ) -> bool {
        let Some(actual) = item.attribute(self.attribute) else {
            return false;
        };
        let Some(operands) = self
            .placeholders
            .iter()
            .map(|p| values.get(p))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };

        match (self.comparator, operands.as_slice()) {
            (Comparator::Between, [low, high]) => {
                matches!(
                    actual.compare(low),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(actual.compare(high), Some(Ordering::Less | Ordering::Equal))
            }
            (Comparator::BeginsWith, [prefix]) => match (&actual, prefix) {
                (ExprValue::S(value), ExprValue::S(prefix)) => value.starts_with(prefix.as_str()),
                _ => false,
            },
            (comparator, [operand]) => {
                let ordering = actual.compare(operand);
                match comparator {
                    Comparator::Eq => ordering == Some(Ordering::Equal),
                    Comparator::Lt => ordering == Some(Ordering::Less),
                    Comparator::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    Comparator::Gt => ordering == Some(Ordering::Greater),
                    Comparator::Ge => {
                        matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
                    }
                    Comparator::Between | Comparator::BeginsWith => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.comparator, self.placeholders.as_slice()) {
            (Comparator::Between, [low, high]) => {
                write!(f, "{} BETWEEN {low} AND {high}", self.attribute)
            }
            (Comparator::BeginsWith, [prefix]) => {
                write!(f, "begins_with({}, {prefix})", self.attribute)
            }
            (comparator, placeholders) => write!(
                f,
                "{} {} {}",
                self.attribute,
                comparator.symbol(),
                placeholders.join(", ")
            ),
        }
    }
}

/// A conjunction of clauses, rendered in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    clauses: Vec<Clause>,
}

impl Expression {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches<T: Attributes + ?Sized>(
        &self,
        item: &T,
        values: &BTreeMap<&'static str, ExprValue>,
    ) -> bool {
        self.clauses.iter().all(|c| c.evaluate(item, values))
    }

    fn placeholders(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.clauses
            .iter()
            .flat_map(|c| c.placeholders.iter().copied())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// How a query reaches its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    /// Key-condition lookup on a table or index.
    Query,
    /// Full scan with a post-read filter.
    Scan,
}

impl AccessPath {
    pub fn is_key_efficient(self) -> bool {
        matches!(self, AccessPath::Query)
    }
}

/// A fully built, immutable query ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    access: AccessPath,
    index_name: Option<String>,
    key_condition: Option<Expression>,
    filter: Option<Expression>,
    values: BTreeMap<&'static str, ExprValue>,
}

impl QuerySpec {
    /// Starts a key-condition query.
    pub fn query() -> QuerySpecBuilder {
        QuerySpecBuilder::new(AccessPath::Query)
    }

    /// Starts a full scan.
    pub fn scan() -> QuerySpecBuilder {
        QuerySpecBuilder::new(AccessPath::Scan)
    }

    pub fn access_path(&self) -> AccessPath {
        self.access
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    pub fn key_condition(&self) -> Option<&Expression> {
        self.key_condition.as_ref()
    }

    pub fn filter(&self) -> Option<&Expression> {
        self.filter.as_ref()
    }

    pub fn values(&self) -> &BTreeMap<&'static str, ExprValue> {
        &self.values
    }

    pub fn key_condition_expression(&self) -> Option<String> {
        self.key_condition.as_ref().map(ToString::to_string)
    }

    pub fn filter_expression(&self) -> Option<String> {
        self.filter.as_ref().map(ToString::to_string)
    }

    /// Evaluates the key condition and the filter against an item.
    pub fn matches<T: Attributes + ?Sized>(&self, item: &T) -> bool {
        self.key_condition
            .as_ref()
            .is_none_or(|k| k.matches(item, &self.values))
            && self
                .filter
                .as_ref()
                .is_none_or(|f| f.matches(item, &self.values))
    }
}

/// Accumulates clauses and bindings; [`build`](Self::build) validates them
/// together so a `QuerySpec` is never partially built.
#[derive(Debug, Clone)]
pub struct QuerySpecBuilder {
    access: AccessPath,
    index_name: Option<String>,
    key_clauses: Vec<Clause>,
    filter_clauses: Vec<Clause>,
    values: BTreeMap<&'static str, ExprValue>,
    conflicts: Vec<&'static str>,
}

impl QuerySpecBuilder {
    fn new(access: AccessPath) -> Self {
        Self {
            access,
            index_name: None,
            key_clauses: Vec::new(),
            filter_clauses: Vec::new(),
            values: BTreeMap::new(),
            conflicts: Vec::new(),
        }
    }

    /// Runs the query against a secondary index.
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Appends a key-condition clause. The first must be the partition key
    /// equality.
    pub fn key(mut self, clause: Clause) -> Self {
        self.key_clauses.push(clause);
        self
    }

    /// Appends a filter clause.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.filter_clauses.push(clause);
        self
    }

    /// Binds a value to a placeholder.
    pub fn bind(mut self, placeholder: &'static str, value: impl Into<ExprValue>) -> Self {
        let value = value.into();
        match self.values.get(placeholder) {
            Some(existing) if *existing != value => self.conflicts.push(placeholder),
            Some(_) => {}
            None => {
                self.values.insert(placeholder, value);
            }
        }
        self
    }

    pub fn build(self) -> Result<QuerySpec, ExpressionError> {
        if let Some(placeholder) = self.conflicts.first() {
            return Err(ExpressionError::ConflictingBinding(*placeholder));
        }

        match self.access {
            AccessPath::Scan => {
                if !self.key_clauses.is_empty() {
                    return Err(ExpressionError::KeyConditionOnScan);
                }
            }
            AccessPath::Query => validate_key_clauses(&self.key_clauses, &self.filter_clauses)?,
        }

        let key_condition = (!self.key_clauses.is_empty()).then(|| Expression {
            clauses: self.key_clauses,
        });
        let filter = (!self.filter_clauses.is_empty()).then(|| Expression {
            clauses: self.filter_clauses,
        });

        let referenced: BTreeSet<&'static str> = key_condition
            .iter()
            .chain(filter.iter())
            .flat_map(Expression::placeholders)
            .collect();

        if let Some(missing) = referenced.iter().find(|p| !self.values.contains_key(*p)) {
            return Err(ExpressionError::UnboundPlaceholder(*missing));
        }
        if let Some(unused) = self.values.keys().find(|p| !referenced.contains(*p)) {
            return Err(ExpressionError::UnusedPlaceholder(*unused));
        }

        Ok(QuerySpec {
            access: self.access,
            index_name: self.index_name,
            key_condition,
            filter,
            values: self.values,
        })
    }
}

fn validate_key_clauses(key: &[Clause], filter: &[Clause]) -> Result<(), ExpressionError> {
    let (partition, sort) = match key {
        [] => return Err(ExpressionError::MissingPartitionKey),
        [partition] => (partition, None),
        [partition, sort] => (partition, Some(sort)),
        _ => return Err(ExpressionError::TooManyKeyConditions(key.len())),
    };

    if partition.comparator != Comparator::Eq {
        return Err(ExpressionError::PartitionKeyNotEquality(partition.attribute));
    }
    if let Some(sort) = sort {
        if sort.attribute == partition.attribute {
            return Err(ExpressionError::DuplicateKeyAttribute(sort.attribute));
        }
    }
    if let Some(clause) = filter
        .iter()
        .find(|c| key.iter().any(|k| k.attribute == c.attribute))
    {
        return Err(ExpressionError::KeyAttributeInFilter(clause.attribute));
    }

    Ok(())
}
