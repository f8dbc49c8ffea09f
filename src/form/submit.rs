use std::future::Future;

use super::controller::{
    FormController, FormResult, SubmitState, transition_submit_state, write_lock,
};
use super::validation::{FormErrors, FormModel};
use crate::feedback::{SubmitNotices, ToastEntry, ToastId, ToastManager};

/// Rejection of a submit action. `message` is the user-facing text, when the
/// rejection carries one.
pub trait SubmitRejection {
    fn message(&self) -> Option<String>;
}

impl SubmitRejection for String {
    fn message(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl SubmitRejection for &'static str {
    fn message(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

impl SubmitRejection for () {
    fn message(&self) -> Option<String> {
        None
    }
}

/// The UI event that triggered a submit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome<R> {
    /// A submission was already in flight.
    Ignored,
    /// Validation failed; the action was not invoked.
    Invalid(FormErrors),
    Succeeded(R),
    /// The action rejected; carries the notified message.
    Failed(String),
}

pub(super) enum SubmitStart<T> {
    Busy,
    Invalid(FormErrors),
    Ready(T),
}

/// Wraps an async action behind the validation gate and the submit lifecycle.
pub struct SubmitHandler<T, F>
where
    T: FormModel,
{
    controller: FormController<T>,
    notices: SubmitNotices,
    toasts: ToastManager,
    on_valid: F,
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn handle_submit<F, Fut, R, E>(
        &self,
        notices: SubmitNotices,
        toasts: ToastManager,
        on_valid: F,
    ) -> SubmitHandler<T, F>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: SubmitRejection,
    {
        SubmitHandler {
            controller: self.clone(),
            notices,
            toasts,
            on_valid,
        }
    }

    pub(super) fn begin_submit(&self) -> FormResult<SubmitStart<T>> {
        let mut state = write_lock(&self.state, "preparing submit")?;
        if state.submit_state == SubmitState::Submitting {
            tracing::debug!(form_id = state.id.0, "submit ignored while submitting");
            return Ok(SubmitStart::Busy);
        }
        transition_submit_state(&mut state, SubmitState::Idle)?;
        state.submit_count = state.submit_count.saturating_add(1);
        self.apply_validation(&mut state, "submit");
        if !state.errors.is_empty() {
            return Ok(SubmitStart::Invalid(state.errors.clone()));
        }
        transition_submit_state(&mut state, SubmitState::Submitting)?;
        Ok(SubmitStart::Ready(state.model.clone()))
    }

    pub(super) fn finish_submit(&self, next: SubmitState) -> FormResult<()> {
        let mut state = write_lock(&self.state, "completing submit")?;
        transition_submit_state(&mut state, next)
    }
}

impl<T, F, Fut, R, E> SubmitHandler<T, F>
where
    T: FormModel,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: SubmitRejection,
{
    pub fn controller(&self) -> &FormController<T> {
        &self.controller
    }

    pub async fn submit(&self, event: &mut SubmitEvent) -> FormResult<SubmitOutcome<R>> {
        event.prevent_default();
        let form_id = self.controller.form_id()?.0;
        let model = match self.controller.begin_submit()? {
            SubmitStart::Busy => return Ok(SubmitOutcome::Ignored),
            SubmitStart::Invalid(errors) => return Ok(SubmitOutcome::Invalid(errors)),
            SubmitStart::Ready(model) => model,
        };

        let pending = self
            .notices
            .pending
            .as_ref()
            .map(|message| self.toasts.show(ToastEntry::pending(message.clone())));
        let mut guard = SubmittingGuard {
            controller: &self.controller,
            toasts: &self.toasts,
            pending,
            armed: true,
        };

        let result = (self.on_valid)(model).await;
        guard.armed = false;

        match result {
            Ok(value) => {
                self.controller.finish_submit(SubmitState::Succeeded)?;
                tracing::info!(form_id, "submit succeeded");
                self.toasts
                    .settle(pending, ToastEntry::success(self.notices.success.clone()));
                Ok(SubmitOutcome::Succeeded(value))
            }
            Err(error) => {
                let message = self.notices.failure.resolve(error.message());
                self.controller.finish_submit(SubmitState::Failed)?;
                tracing::warn!(form_id, %message, "submit failed");
                self.toasts.settle(pending, ToastEntry::failure(message.clone()));
                Ok(SubmitOutcome::Failed(message))
            }
        }
    }
}

/// Returns the form to Idle and withdraws the pending toast if the submit
/// future is dropped mid-flight.
struct SubmittingGuard<'a, T>
where
    T: FormModel,
{
    controller: &'a FormController<T>,
    toasts: &'a ToastManager,
    pending: Option<ToastId>,
    armed: bool,
}

impl<T> Drop for SubmittingGuard<'_, T>
where
    T: FormModel,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(id) = self.pending {
            self.toasts.dismiss(id);
        }
        let Ok(mut state) = self.controller.state.write() else {
            return;
        };
        if state.submit_state == SubmitState::Submitting {
            state.submit_state = SubmitState::Idle;
            tracing::warn!(form_id = state.id.0, "submit abandoned before settling");
        }
    }
}
