use crate::collection::Document;
use crate::common::{now_millis, Value};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use std::fmt::Display;

/// Behavior switches for an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    upsert: bool,
    return_new: bool,
    just_once: bool,
}

impl UpdateOptions {
    pub fn new(upsert: bool, just_once: bool) -> Self {
        UpdateOptions {
            upsert,
            return_new: false,
            just_once,
        }
    }

    /// Insert a document built from the filter's equalities when nothing matches.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    /// Return the post-image instead of the pre-image from find-and-modify.
    pub fn return_new(mut self, return_new: bool) -> Self {
        self.return_new = return_new;
        self
    }

    pub fn just_once(mut self, just_once: bool) -> Self {
        self.just_once = just_once;
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    pub fn is_return_new(&self) -> bool {
        self.return_new
    }

    pub fn is_just_once(&self) -> bool {
        self.just_once
    }
}

/// A single field or array mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperator {
    Set(String, Value),
    Unset(String),
    Inc(String, Value),
    Mul(String, Value),
    Min(String, Value),
    Max(String, Value),
    /// Moves a field's value to a new path.
    Rename(String, String),
    /// Sets the current time as a timestamp.
    CurrentDate(String),
    /// Sets the current time as epoch milliseconds.
    CurrentTimestamp(String),
    Push(String, Value),
    PushAll(String, Vec<Value>),
    AddToSet(String, Value),
    PopFirst(String),
    PopLast(String),
    Pull(String, Value),
    PullAll(String, Vec<Value>),
}

impl UpdateOperator {
    /// The path this operator writes.
    pub fn field(&self) -> &str {
        match self {
            UpdateOperator::Set(field, _)
            | UpdateOperator::Unset(field)
            | UpdateOperator::Inc(field, _)
            | UpdateOperator::Mul(field, _)
            | UpdateOperator::Min(field, _)
            | UpdateOperator::Max(field, _)
            | UpdateOperator::Rename(field, _)
            | UpdateOperator::CurrentDate(field)
            | UpdateOperator::CurrentTimestamp(field)
            | UpdateOperator::Push(field, _)
            | UpdateOperator::PushAll(field, _)
            | UpdateOperator::AddToSet(field, _)
            | UpdateOperator::PopFirst(field)
            | UpdateOperator::PopLast(field)
            | UpdateOperator::Pull(field, _)
            | UpdateOperator::PullAll(field, _) => field,
        }
    }

    pub fn apply(&self, document: &mut Document) -> TesseraResult<()> {
        match self {
            UpdateOperator::Set(field, value) => {
                document.set(field, value.clone());
            }
            UpdateOperator::Unset(field) => {
                document.unset(field);
            }
            UpdateOperator::Inc(field, amount) => {
                let amount = numeric_operand("inc", field, amount)?;
                let updated = match present(document, field) {
                    None => amount.clone(),
                    Some(current) => arithmetic("inc", field, current, amount, i64::checked_add, |a, b| a + b)?,
                };
                document.set(field, updated);
            }
            UpdateOperator::Mul(field, factor) => {
                let factor = numeric_operand("mul", field, factor)?;
                let updated = match present(document, field) {
                    None if factor.is_int() => Value::Int(0),
                    None => Value::Float(0.0),
                    Some(current) => arithmetic("mul", field, current, factor, i64::checked_mul, |a, b| a * b)?,
                };
                document.set(field, updated);
            }
            UpdateOperator::Min(field, value) => {
                let replace = match present(document, field) {
                    None => true,
                    Some(current) => value < current,
                };
                if replace {
                    document.set(field, value.clone());
                }
            }
            UpdateOperator::Max(field, value) => {
                let replace = match present(document, field) {
                    None => true,
                    Some(current) => value > current,
                };
                if replace {
                    document.set(field, value.clone());
                }
            }
            UpdateOperator::Rename(from, to) => {
                if let Some(value) = document.unset(from) {
                    document.set(to, value);
                }
            }
            UpdateOperator::CurrentDate(field) => {
                document.set(field, now_millis());
            }
            UpdateOperator::CurrentTimestamp(field) => {
                document.set(field, now_millis().timestamp_millis());
            }
            UpdateOperator::Push(field, value) => {
                let mut items = array_or_empty("push", document, field)?;
                items.push(value.clone());
                document.set(field, Value::Array(items));
            }
            UpdateOperator::PushAll(field, values) => {
                let mut items = array_or_empty("push_all", document, field)?;
                items.extend(values.iter().cloned());
                document.set(field, Value::Array(items));
            }
            UpdateOperator::AddToSet(field, value) => {
                let mut items = array_or_empty("add_to_set", document, field)?;
                if !items.contains(value) {
                    items.push(value.clone());
                }
                document.set(field, Value::Array(items));
            }
            UpdateOperator::PopFirst(field) => {
                if let Some(mut items) = existing_array("pop_first", document, field)? {
                    if !items.is_empty() {
                        items.remove(0);
                    }
                    document.set(field, Value::Array(items));
                }
            }
            UpdateOperator::PopLast(field) => {
                if let Some(mut items) = existing_array("pop_last", document, field)? {
                    items.pop();
                    document.set(field, Value::Array(items));
                }
            }
            UpdateOperator::Pull(field, value) => {
                if let Some(mut items) = existing_array("pull", document, field)? {
                    items.retain(|item| item != value);
                    document.set(field, Value::Array(items));
                }
            }
            UpdateOperator::PullAll(field, values) => {
                if let Some(mut items) = existing_array("pull_all", document, field)? {
                    items.retain(|item| !values.contains(item));
                    document.set(field, Value::Array(items));
                }
            }
        }
        Ok(())
    }
}

/// Everything one update call carries to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    pub operators: Vec<UpdateOperator>,
    /// Applied only to a document created by upsert, before `operators`.
    pub on_insert: Vec<UpdateOperator>,
    pub options: UpdateOptions,
}

impl UpdateSpec {
    pub fn new(operators: Vec<UpdateOperator>) -> Self {
        UpdateSpec {
            operators,
            on_insert: Vec::new(),
            options: UpdateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_on_insert(mut self, on_insert: Vec<UpdateOperator>) -> Self {
        self.on_insert = on_insert;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Applies the operators in order.
    pub fn apply(&self, document: &mut Document) -> TesseraResult<()> {
        for operator in &self.operators {
            operator.apply(document)?;
        }
        Ok(())
    }

    /// Applies the insert-only operators, then the regular ones.
    pub fn apply_for_insert(&self, document: &mut Document) -> TesseraResult<()> {
        for operator in &self.on_insert {
            operator.apply(document)?;
        }
        self.apply(document)
    }
}

/// Outcome of an update call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    /// Modified documents, counting an upsert as one.
    pub fn affected(&self) -> u64 {
        self.modified + u64::from(self.upserted_id.is_some())
    }
}

fn present<'a>(document: &'a Document, field: &str) -> Option<&'a Value> {
    document.get(field).filter(|value| !value.is_null())
}

fn operator_error(operator: &str, field: &str, detail: impl Display) -> TesseraError {
    log::error!("Cannot apply {} to field '{}': {}", operator, field, detail);
    TesseraError::new(
        &format!("Cannot apply {} to field '{}': {}", operator, field, detail),
        ErrorKind::InvalidDataType,
    )
}

fn numeric_operand<'a>(operator: &str, field: &str, operand: &'a Value) -> TesseraResult<&'a Value> {
    if operand.is_number() {
        Ok(operand)
    } else {
        Err(operator_error(
            operator,
            field,
            format!("operand is {}", operand.type_name()),
        ))
    }
}

fn arithmetic(
    operator: &str,
    field: &str,
    current: &Value,
    operand: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> TesseraResult<Value> {
    match (current, operand) {
        (Value::Int(a), Value::Int(b)) => Ok(match int_op(*a, *b) {
            Some(result) => Value::Int(result),
            None => Value::Float(float_op(*a as f64, *b as f64)),
        }),
        _ => match (current.as_number(), operand.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(operator_error(
                operator,
                field,
                format!("field holds {}", current.type_name()),
            )),
        },
    }
}

fn array_or_empty(operator: &str, document: &Document, field: &str) -> TesseraResult<Vec<Value>> {
    Ok(existing_array(operator, document, field)?.unwrap_or_default())
}

fn existing_array(
    operator: &str,
    document: &Document,
    field: &str,
) -> TesseraResult<Option<Vec<Value>>> {
    match present(document, field) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.clone())),
        Some(other) => Err(operator_error(
            operator,
            field,
            format!("field holds {}", other.type_name()),
        )),
    }
}
