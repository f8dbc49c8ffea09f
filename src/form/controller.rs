use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::{FieldLens, FieldSchema, FormErrors, FormModel, validate};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// When validation runs before the first submit attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

/// When validation runs once the form has been submitted at least once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevalidateMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Trigger {
    Change,
    Blur,
}

impl ValidationMode {
    fn fires_on(self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (Self::OnChange, Trigger::Change) | (Self::OnBlur, Trigger::Blur)
        )
    }
}

impl RevalidateMode {
    fn fires_on(self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (Self::OnChange, Trigger::Change) | (Self::OnBlur, Trigger::Blur)
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub revalidate_mode: RevalidateMode,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnSubmit,
            revalidate_mode: RevalidateMode::OnChange,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub dirty: bool,
    pub touched: bool,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub errors: FormErrors,
    pub field_meta: BTreeMap<FieldKey, FieldMeta>,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FormState<T> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub(super) errors: FormErrors,
}

impl<T> FormState<T> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta {
        self.field_meta.entry(key).or_default()
    }
}

/// Owns one form's values, errors and submission state.
#[derive(Clone)]
pub struct FormController<T>
where
    T: FormModel,
{
    pub(super) options: FormOptions,
    pub(super) schema: Arc<FieldSchema<T>>,
    pub(super) state: Arc<RwLock<FormState<T>>>,
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn new(initial: T, schema: FieldSchema<T>, options: FormOptions) -> Self {
        let field_meta = T::KEYS
            .iter()
            .map(|key| (*key, FieldMeta::default()))
            .collect();
        Self {
            options,
            schema: Arc::new(schema),
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                field_meta,
                errors: FormErrors::new(),
            })),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn schema(&self) -> &FieldSchema<T> {
        &self.schema
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "writing form model")?;
        lens.set(&mut state.model, value);
        let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
        state.ensure_meta(key).dirty = is_dirty;

        if self.fires_on(&state, Trigger::Change) {
            self.apply_validation(&mut state, "change");
        }
        Ok(())
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut state = write_lock(&self.state, "touching field")?;
        state.ensure_meta(lens.key()).touched = true;

        if self.fires_on(&state, Trigger::Blur) {
            self.apply_validation(&mut state, "blur");
        }
        Ok(())
    }

    /// Runs a full validation pass and stores the result.
    pub fn validate_form(&self) -> FormResult<FormErrors> {
        let mut state = write_lock(&self.state, "validating form")?;
        self.apply_validation(&mut state, "explicit");
        Ok(state.errors.clone())
    }

    pub fn errors(&self) -> FormResult<FormErrors> {
        Ok(read_lock(&self.state, "reading form errors")?.errors.clone())
    }

    pub fn field_error<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field error")?
            .errors
            .get(lens.key())
            .map(str::to_string))
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .copied())
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_dirty: state.field_meta.values().any(|meta| meta.dirty),
            errors: state.errors.clone(),
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        if state.submit_state == SubmitState::Submitting {
            return Err(FormError::InvalidStateTransition {
                from: SubmitState::Submitting,
                to: SubmitState::Idle,
            });
        }
        state.model = state.initial_model.clone();
        state.submit_state = SubmitState::Idle;
        state.submit_count = 0;
        state.errors = FormErrors::new();
        for meta in state.field_meta.values_mut() {
            *meta = FieldMeta::default();
        }
        Ok(())
    }

    fn fires_on(&self, state: &FormState<T>, trigger: Trigger) -> bool {
        if state.submit_count == 0 {
            self.options.validate_mode.fires_on(trigger)
        } else {
            self.options.revalidate_mode.fires_on(trigger)
        }
    }

    pub(super) fn apply_validation(&self, state: &mut FormState<T>, reason: &'static str) {
        state.errors = validate(self.schema(), &state.model);
        tracing::debug!(
            form_id = state.id.0,
            reason,
            invalid_fields = state.errors.len(),
            "form validated"
        );
    }
}

pub(super) fn transition_submit_state<T>(
    state: &mut FormState<T>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
