use std::time::Duration;

use futures::executor::block_on;

#[test]
fn prelude_exposes_screens_and_form_core() {
    use crate::prelude::*;

    let toasts = ToastManager::new();
    let i18n = I18nManager::with_locale("pt-BR");
    let screen = LoginScreen::new(
        &i18n,
        toasts.clone(),
        std::sync::Arc::new(SimulatedAuthenticator::new(Duration::ZERO)),
    );
    let view: FormView = screen.view().expect("view");
    assert_eq!(view.submit_state, SubmitState::Idle);
    assert_eq!(
        screen.controller().options(),
        FormOptions {
            validate_mode: ValidationMode::OnSubmit,
            revalidate_mode: RevalidateMode::OnChange,
        }
    );
}

#[test]
fn app_facade_wires_shared_toasts() {
    let mut config = crate::AuthConfig::local("http://127.0.0.1:9").expect("config");
    config.login_mode = crate::LoginMode::Simulated {
        delay: Duration::ZERO,
    };
    let app = crate::BibliotechApp::new(config).expect("app");
    assert_eq!(app.i18n().resolved_locale(), "pt-BR");

    app.login().email().on_change("user@example.com").expect("email");
    app.login().password().on_change("secret1").expect("password");
    let mut event = crate::form::SubmitEvent::new();
    let outcome = block_on(app.login().submit(&mut event)).expect("submit");

    assert_eq!(outcome, crate::form::SubmitOutcome::Succeeded(()));
    assert!(event.default_prevented());
    assert_eq!(
        app.toasts().latest().map(|toast| toast.message),
        Some("Login realizado com sucesso!".to_string())
    );
}

#[test]
fn form_facade_exports_schema_types() {
    let _ = crate::form::FormOptions::default();
    let _ = crate::form::RuleStage::CrossField;
    let _ = crate::form::ValueType::String;
    let _ = crate::form::FormErrors::new();
    let _ = crate::feedback::ToastKind::Pending;
    let _ = crate::i18n::DEFAULT_LOCALE;
}
