use std::collections::BTreeMap;
use std::sync::Arc;

use super::controller::FieldKey;

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    /// Field keys in declaration order.
    const KEYS: &'static [FieldKey];

    fn fields() -> Self::Fields;
}

/// Snapshot of every schema field as plain strings, keyed by field name.
pub type FormValues = BTreeMap<FieldKey, String>;

/// Evaluation stage of a constraint. Stages run in declaration order of this
/// enum, after the required check.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RuleStage {
    Format,
    Length,
    CrossField,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValueType {
    #[default]
    String,
}

type Predicate<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;
type Accessor<T> = Arc<dyn ReadText<T>>;

trait ReadText<T>: Send + Sync {
    fn read<'a>(&self, model: &'a T) -> &'a str;
}

impl<T, L> ReadText<T> for L
where
    L: FieldLens<T, Value = String>,
{
    fn read<'a>(&self, model: &'a T) -> &'a str {
        self.get(model).as_str()
    }
}

#[derive(Clone)]
pub struct Constraint<T> {
    stage: RuleStage,
    predicate: Predicate<T>,
    message: String,
    reads: Option<FieldKey>,
}

impl<T> Constraint<T> {
    pub fn stage(&self) -> RuleStage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sibling field this constraint reads, if any.
    pub fn reads(&self) -> Option<FieldKey> {
        self.reads
    }
}

/// Validation rules for one field: required check, then constraints by stage.
#[derive(Clone)]
pub struct FieldRule<T> {
    key: FieldKey,
    accessor: Accessor<T>,
    required: Option<String>,
    value_type: ValueType,
    constraints: Vec<Constraint<T>>,
}

impl<T> FieldRule<T>
where
    T: 'static,
{
    pub fn new<L>(lens: L) -> Self
    where
        L: FieldLens<T, Value = String>,
    {
        Self {
            key: lens.key(),
            accessor: Arc::new(lens),
            required: None,
            value_type: ValueType::String,
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.rule(RuleStage::Format, |_, value| is_email(value), message)
    }

    pub fn min_len(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(
            RuleStage::Length,
            move |_, value| value.chars().count() >= min,
            message,
        )
    }

    pub fn max_len(self, max: usize, message: impl Into<String>) -> Self {
        self.rule(
            RuleStage::Length,
            move |_, value| value.chars().count() <= max,
            message,
        )
    }

    /// The field must equal the current value of `other`.
    pub fn matches_field<L>(mut self, other: L, message: impl Into<String>) -> Self
    where
        L: FieldLens<T, Value = String>,
    {
        self.push(Constraint {
            stage: RuleStage::CrossField,
            predicate: Arc::new(move |model: &T, value: &str| other.read(model) == value),
            message: message.into(),
            reads: Some(other.key()),
        });
        self
    }

    pub fn rule(
        mut self,
        stage: RuleStage,
        predicate: impl Fn(&T, &str) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.push(Constraint {
            stage,
            predicate: Arc::new(predicate),
            message: message.into(),
            reads: None,
        });
        self
    }

    fn push(&mut self, constraint: Constraint<T>) {
        let index = self
            .constraints
            .iter()
            .position(|existing| existing.stage > constraint.stage)
            .unwrap_or(self.constraints.len());
        self.constraints.insert(index, constraint);
    }
}

impl<T> FieldRule<T> {
    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn constraints(&self) -> &[Constraint<T>] {
        &self.constraints
    }

    pub fn value<'a>(&self, model: &'a T) -> &'a str {
        self.accessor.read(model)
    }

    /// First failing message for this field, short-circuiting on the first failure.
    pub fn check(&self, model: &T) -> Option<&str> {
        let value = self.value(model);
        if value.is_empty() {
            return self.required.as_deref();
        }
        self.constraints
            .iter()
            .find(|constraint| !(constraint.predicate)(model, value))
            .map(|constraint| constraint.message.as_str())
    }
}

/// Ordered rule table for a form.
#[derive(Clone)]
pub struct FieldSchema<T> {
    rules: Vec<FieldRule<T>>,
}

impl<T> Default for FieldSchema<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> FieldSchema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any earlier rule for the same key in place.
    pub fn field(mut self, rule: FieldRule<T>) -> Self {
        if let Some(existing) = self.rules.iter_mut().find(|r| r.key == rule.key) {
            *existing = rule;
        } else {
            self.rules.push(rule);
        }
        self
    }

    pub fn rules(&self) -> &[FieldRule<T>] {
        &self.rules
    }

    pub fn rule(&self, key: FieldKey) -> Option<&FieldRule<T>> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.rules.iter().map(|rule| rule.key)
    }

    /// Fields with a rule that reads `source`.
    pub fn dependents(&self, source: FieldKey) -> Vec<FieldKey> {
        self.rules
            .iter()
            .filter(|rule| {
                rule.constraints
                    .iter()
                    .any(|constraint| constraint.reads == Some(source))
            })
            .map(|rule| rule.key)
            .collect()
    }

    pub fn values(&self, model: &T) -> FormValues {
        self.rules
            .iter()
            .map(|rule| (rule.key, rule.value(model).to_string()))
            .collect()
    }
}

/// Failing fields and their messages. Passing fields are absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormErrors(BTreeMap<FieldKey, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }
}

impl FromIterator<(FieldKey, String)> for FormErrors {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn validate<T>(schema: &FieldSchema<T>, model: &T) -> FormErrors {
    schema
        .rules
        .iter()
        .filter_map(|rule| {
            rule.check(model)
                .map(|message| (rule.key, message.to_string()))
        })
        .collect()
}

pub fn validate_field<T>(schema: &FieldSchema<T>, key: FieldKey, model: &T) -> Option<String> {
    schema
        .rule(key)
        .and_then(|rule| rule.check(model))
        .map(str::to_string)
}

/// Same acceptance as the HTML living-standard address pattern: a local part
/// of atext characters and dots, then one or more hostname labels.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }
    domain.split('.').all(is_domain_label)
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_domain_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
