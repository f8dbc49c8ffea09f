use super::*;
use futures::channel::oneshot;
use futures::executor::block_on;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::feedback::{FailureNotice, SubmitNotices, ToastKind, ToastManager};

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
struct SignupForm {
    name: String,
    email: String,
    password: String,
    #[form(key = "confirmPassword")]
    confirm_password: String,
}

fn filled() -> SignupForm {
    SignupForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: "abc12345".into(),
        confirm_password: "abc12345".into(),
    }
}

fn schema() -> FieldSchema<SignupForm> {
    let fields = SignupForm::fields();
    FieldSchema::new()
        .field(FieldRule::new(fields.name()).required("Nome é obrigatório"))
        .field(
            FieldRule::new(fields.email())
                .required("Email é obrigatório")
                .email("Email inválido"),
        )
        .field(
            FieldRule::new(fields.password())
                .required("Senha é obrigatória")
                .min_len(6, "A senha deve ter pelo menos 6 caracteres"),
        )
        .field(
            FieldRule::new(fields.confirm_password())
                .required("Confirmação de senha obrigatória")
                .matches_field(fields.password(), "As senhas não coincidem"),
        )
}

fn notices() -> SubmitNotices {
    SubmitNotices::new(
        "Cadastro realizado com sucesso!",
        FailureNotice::ErrorOrFallback("Erro no cadastro".into()),
    )
    .pending("Cadastrando...")
}

fn controller_with(model: SignupForm, options: FormOptions) -> FormController<SignupForm> {
    FormController::new(model, schema(), options)
}

#[test]
fn derive_macro_generates_field_lenses() {
    let fields = SignupForm::fields();
    let mut model = SignupForm::default();

    fields.email().set(&mut model, "ana@example.com".into());
    assert_eq!(fields.email().get(&model), "ana@example.com");
    assert_eq!(fields.email().key().as_str(), "email");
    assert_eq!(fields.confirm_password().key().as_str(), "confirmPassword");
    assert_eq!(
        SignupForm::KEYS,
        &[
            FieldKey::new("name"),
            FieldKey::new("email"),
            FieldKey::new("password"),
            FieldKey::new("confirmPassword"),
        ]
    );
}

#[test]
fn empty_field_reports_only_the_required_message() {
    let errors = validate(&schema(), &SignupForm::default());
    let fields = SignupForm::fields();

    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get(fields.email().key()), Some("Email é obrigatório"));
    assert_eq!(
        errors.get(fields.password().key()),
        Some("Senha é obrigatória")
    );
    assert_eq!(
        errors.get(fields.confirm_password().key()),
        Some("Confirmação de senha obrigatória")
    );
}

#[test]
fn empty_optional_field_skips_its_constraints() {
    let fields = SignupForm::fields();
    let schema = FieldSchema::new().field(FieldRule::new(fields.email()).email("Email inválido"));
    assert!(validate(&schema, &SignupForm::default()).is_empty());

    let model = SignupForm {
        email: "nope".into(),
        ..SignupForm::default()
    };
    assert_eq!(
        validate_field(&schema, fields.email().key(), &model).as_deref(),
        Some("Email inválido")
    );
}

#[test]
fn mismatch_is_reported_whenever_confirmation_differs() {
    let fields = SignupForm::fields();
    for (password, confirm) in [("abc12345", "abc999"), ("", "x"), ("abc", "abcd")] {
        let model = SignupForm {
            password: password.into(),
            confirm_password: confirm.into(),
            ..filled()
        };
        assert_eq!(
            validate_field(&schema(), fields.confirm_password().key(), &model).as_deref(),
            Some("As senhas não coincidem"),
            "{password:?} vs {confirm:?}"
        );
    }

    assert_eq!(
        validate_field(&schema(), fields.confirm_password().key(), &filled()),
        None
    );
}

#[test]
fn constraints_short_circuit_in_stage_order() {
    let fields = SignupForm::fields();
    let schema = FieldSchema::new().field(
        FieldRule::new(fields.password())
            .rule(RuleStage::CrossField, |_, _| false, "cross")
            .min_len(6, "length")
            .rule(RuleStage::Format, |_, value| value.is_ascii(), "format")
            .required("required"),
    );

    let stages = schema
        .rule(fields.password().key())
        .map(|rule| {
            rule.constraints()
                .iter()
                .map(Constraint::stage)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    assert_eq!(
        stages,
        vec![RuleStage::Format, RuleStage::Length, RuleStage::CrossField]
    );

    let check = |password: &str| {
        let model = SignupForm {
            password: password.into(),
            ..SignupForm::default()
        };
        validate_field(&schema, fields.password().key(), &model)
    };
    assert_eq!(check("").as_deref(), Some("required"));
    assert_eq!(check("ção").as_deref(), Some("format"));
    assert_eq!(check("abc").as_deref(), Some("length"));
    assert_eq!(check("abcdef").as_deref(), Some("cross"));
}

#[test]
fn length_counts_characters_not_bytes() {
    let fields = SignupForm::fields();
    let model = SignupForm {
        password: "çççççç".into(),
        confirm_password: "çççççç".into(),
        ..filled()
    };
    assert_eq!(validate_field(&schema(), fields.password().key(), &model), None);
}

#[test]
fn schema_field_replaces_existing_rule_for_key() {
    let fields = SignupForm::fields();
    let schema = schema().field(FieldRule::new(fields.name()).required("Informe o nome"));
    assert_eq!(schema.rules().len(), 4);
    assert_eq!(
        validate_field(&schema, fields.name().key(), &SignupForm::default()).as_deref(),
        Some("Informe o nome")
    );
    assert_eq!(
        schema.keys().map(FieldKey::as_str).collect::<Vec<_>>(),
        vec!["name", "email", "password", "confirmPassword"]
    );
}

#[test]
fn validation_is_idempotent() {
    let model = SignupForm {
        email: "bad".into(),
        confirm_password: "other".into(),
        ..filled()
    };
    let first = validate(&schema(), &model);
    let second = validate(&schema(), &model);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn default_options_validate_on_submit_then_on_change() {
    let controller = controller_with(SignupForm::default(), FormOptions::default());
    let binding = controller.register_field(SignupForm::fields().email());

    binding.on_change("bad").expect("change");
    binding.on_blur().expect("blur");
    assert!(controller.errors().expect("errors").is_empty());

    let outcome = block_on(
        controller
            .handle_submit(notices(), ToastManager::new(), |_form: SignupForm| async {
                Ok::<_, String>(())
            })
            .submit(&mut SubmitEvent::new()),
    )
    .expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Invalid(ref errors) if errors.len() == 4));
    assert_eq!(binding.error().expect("error").as_deref(), Some("Email inválido"));

    binding.on_change("ana@example.com").expect("change");
    assert_eq!(binding.error().expect("error"), None);
}

#[test]
fn on_blur_mode_validates_when_field_is_left() {
    let controller = controller_with(
        SignupForm::default(),
        FormOptions {
            validate_mode: ValidationMode::OnBlur,
            revalidate_mode: RevalidateMode::OnBlur,
        },
    );
    let email = controller.register_field(SignupForm::fields().email());

    email.on_change("bad").expect("change");
    assert!(controller.errors().expect("errors").is_empty());

    email.on_blur().expect("blur");
    assert_eq!(email.error().expect("error").as_deref(), Some("Email inválido"));
}

#[test]
fn errors_are_hidden_until_touched_or_submitted() {
    let controller = controller_with(
        SignupForm::default(),
        FormOptions {
            validate_mode: ValidationMode::OnChange,
            revalidate_mode: RevalidateMode::OnChange,
        },
    );
    let fields = SignupForm::fields();
    let email = controller.register_field(fields.email());

    email.on_change("bad").expect("change");
    assert_eq!(
        controller.field_error(fields.email()).expect("error").as_deref(),
        Some("Email inválido")
    );
    assert_eq!(email.error().expect("display error"), None);

    email.on_blur().expect("blur");
    assert_eq!(
        email.error().expect("display error").as_deref(),
        Some("Email inválido")
    );
    assert_eq!(
        controller.field_meta(fields.email()).expect("meta"),
        Some(FieldMeta {
            dirty: true,
            touched: true,
        })
    );
}

#[test]
fn confirmation_error_tracks_password_edits_after_submit() {
    let controller = controller_with(
        SignupForm {
            confirm_password: "abc999".into(),
            ..filled()
        },
        FormOptions::default(),
    );
    let fields = SignupForm::fields();
    let password = controller.register_field(fields.password());
    let confirm = controller.register_field(fields.confirm_password());

    let outcome = block_on(
        controller
            .handle_submit(notices(), ToastManager::new(), |_form: SignupForm| async {
                Ok::<_, String>(())
            })
            .submit(&mut SubmitEvent::new()),
    )
    .expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(
        confirm.error().expect("error").as_deref(),
        Some("As senhas não coincidem")
    );

    password.on_change("abc999").expect("change");
    assert_eq!(confirm.error().expect("error"), None);

    password.on_change("abc12345").expect("change");
    assert_eq!(
        confirm.error().expect("error").as_deref(),
        Some("As senhas não coincidem")
    );
}

#[test]
fn invalid_submit_never_invokes_action() {
    let controller = controller_with(
        SignupForm {
            confirm_password: "abc999".into(),
            ..filled()
        },
        FormOptions::default(),
    );
    let calls = Arc::new(AtomicUsize::new(0));
    let toasts = ToastManager::new();
    let handler = controller.handle_submit(notices(), toasts.clone(), {
        let calls = calls.clone();
        move |_form: SignupForm| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(()) }
        }
    });

    let mut event = SubmitEvent::new();
    let outcome = block_on(handler.submit(&mut event)).expect("submit");

    assert!(event.default_prevented());
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.submit_state().expect("state"), SubmitState::Idle);
    assert!(toasts.list().is_empty());
}

#[test]
fn successful_submit_settles_success_toast() {
    let controller = controller_with(filled(), FormOptions::default());
    let toasts = ToastManager::new();
    let seen = Arc::new(Mutex::new(None));
    let handler = controller.handle_submit(notices(), toasts.clone(), {
        let seen = seen.clone();
        move |form: SignupForm| {
            if let Ok(mut slot) = seen.lock() {
                *slot = Some(form);
            }
            async { Ok::<_, String>(201_u16) }
        }
    });

    let outcome = block_on(handler.submit(&mut SubmitEvent::new())).expect("submit");

    assert_eq!(outcome, SubmitOutcome::Succeeded(201));
    assert_eq!(seen.lock().expect("lock").clone(), Some(filled()));
    assert_eq!(
        controller.submit_state().expect("state"),
        SubmitState::Succeeded
    );
    let visible = toasts.list();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].kind, ToastKind::Success);
    assert_eq!(visible[0].message, "Cadastro realizado com sucesso!");
}

#[test]
fn failed_submit_keeps_values_and_reports_message() {
    let controller = controller_with(filled(), FormOptions::default());
    let toasts = ToastManager::new();
    let handler = controller.handle_submit(notices(), toasts.clone(), |_form: SignupForm| async {
        Err::<(), _>("email already registered".to_string())
    });

    let outcome = block_on(handler.submit(&mut SubmitEvent::new())).expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("email already registered".into())
    );
    assert_eq!(controller.submit_state().expect("state"), SubmitState::Failed);
    assert_eq!(controller.snapshot().expect("snapshot").model, filled());
    assert_eq!(
        toasts.latest().map(|toast| (toast.kind, toast.message)),
        Some((ToastKind::Failure, "email already registered".to_string()))
    );

    let fallback = controller.handle_submit(notices(), toasts.clone(), |_form: SignupForm| async {
        Err::<(), _>(())
    });
    let outcome = block_on(fallback.submit(&mut SubmitEvent::new())).expect("resubmit");
    assert_eq!(outcome, SubmitOutcome::Failed("Erro no cadastro".into()));
    assert_eq!(controller.view().expect("view").submit_count, 2);
}

#[test]
fn submit_is_ignored_while_in_flight() {
    let controller = controller_with(filled(), FormOptions::default());
    let toasts = ToastManager::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel::<Result<(), String>>();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let handler = controller.handle_submit(notices(), toasts.clone(), {
        let calls = calls.clone();
        move |_form: SignupForm| {
            calls.fetch_add(1, Ordering::SeqCst);
            let rx = rx.lock().ok().and_then(|mut slot| slot.take());
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or_else(|_| Err("cancelled".into())),
                    None => Ok(()),
                }
            }
        }
    });

    block_on(async {
        let mut first_event = SubmitEvent::new();
        let first = handler.submit(&mut first_event);
        futures::pin_mut!(first);
        assert!(futures::poll!(first.as_mut()).is_pending());

        let view = controller.view().expect("view");
        assert!(view.is_submitting);
        assert_eq!(
            toasts.latest().map(|toast| (toast.kind, toast.message)),
            Some((ToastKind::Pending, "Cadastrando...".to_string()))
        );

        let mut second_event = SubmitEvent::new();
        let second = handler.submit(&mut second_event).await.expect("second");
        assert_eq!(second, SubmitOutcome::Ignored);
        assert!(second_event.default_prevented());

        tx.send(Ok(())).expect("send");
        assert_eq!(first.await.expect("first"), SubmitOutcome::Succeeded(()));
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.view().expect("view").submit_count, 1);
    let visible = toasts.list();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].kind, ToastKind::Success);
}

#[test]
fn dropped_submit_returns_form_to_idle_and_withdraws_pending_toast() {
    let controller = controller_with(filled(), FormOptions::default());
    let toasts = ToastManager::new();
    let (_tx, rx) = oneshot::channel::<Result<(), String>>();
    let rx = Arc::new(Mutex::new(Some(rx)));
    let handler = controller.handle_submit(notices(), toasts.clone(), move |_form: SignupForm| {
        let rx = rx.lock().ok().and_then(|mut slot| slot.take());
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| Err("cancelled".into())),
                None => Ok(()),
            }
        }
    });

    block_on(async {
        let mut event = SubmitEvent::new();
        let mut pending = Box::pin(handler.submit(&mut event));
        assert!(futures::poll!(pending.as_mut()).is_pending());
        assert_eq!(
            controller.submit_state().expect("state"),
            SubmitState::Submitting
        );
        assert_eq!(
            toasts.latest().map(|toast| toast.kind),
            Some(ToastKind::Pending)
        );
        drop(pending);
    });

    assert_eq!(controller.submit_state().expect("state"), SubmitState::Idle);
    assert!(toasts.list().is_empty());
}

#[test]
fn reset_restores_initial_values_and_clears_meta() {
    let controller = controller_with(SignupForm::default(), FormOptions::default());
    let fields = SignupForm::fields();
    let name = controller.register_field(fields.name());

    name.on_change("Ana").expect("change");
    name.on_blur().expect("blur");
    let _ = block_on(
        controller
            .handle_submit(notices(), ToastManager::new(), |_form: SignupForm| async {
                Ok::<_, String>(())
            })
            .submit(&mut SubmitEvent::new()),
    )
    .expect("submit");
    assert!(controller.snapshot().expect("snapshot").is_dirty);

    controller.reset().expect("reset");
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.model, SignupForm::default());
    assert_eq!(snapshot.submit_count, 0);
    assert!(snapshot.errors.is_empty());
    assert!(!snapshot.is_dirty);
    assert_eq!(name.value().expect("value"), "");
}

#[test]
fn dirty_flag_follows_initial_value() {
    let controller = controller_with(filled(), FormOptions::default());
    let fields = SignupForm::fields();
    let name = controller.register_field(fields.name());

    name.on_change("Bia").expect("change");
    assert_eq!(
        controller.field_meta(fields.name()).expect("meta").map(|meta| meta.dirty),
        Some(true)
    );
    name.on_change("Ana").expect("change back");
    assert!(!controller.snapshot().expect("snapshot").is_dirty);
}

#[test]
fn schema_values_snapshot_uses_wire_keys() {
    let values = schema().values(&filled());
    assert_eq!(
        values.get(&FieldKey::new("confirmPassword")).map(String::as_str),
        Some("abc12345")
    );
    assert_eq!(values.len(), 4);
}

#[test]
fn view_validity_reflects_values_before_any_validation_pass() {
    let controller = controller_with(SignupForm::default(), FormOptions::default());
    let view = controller.view().expect("view");
    assert!(!view.is_valid);
    assert!(controller.errors().expect("errors").is_empty());

    let controller = controller_with(filled(), FormOptions::default());
    assert!(controller.view().expect("view").is_valid);

    controller
        .register_field(SignupForm::fields().confirm_password())
        .on_change("abc999")
        .expect("change");
    assert!(!controller.view().expect("view").is_valid);
}
