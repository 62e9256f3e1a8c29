//! Embedded stub tree.
//!
//! Every template unit the add-on ships is compiled into the binary with
//! `include_str!`, so a `graft` install never depends on files next to the
//! executable. The table below is the single source of truth for which
//! stubs exist; `StubUnit` paths in the orchestrator resolve against it.

use graft_core::{
    application::{ApplicationError, ports::StubSource},
    error::GraftResult,
};

/// `(relative path, content)` for every stub shipped with the add-on.
static STUBS: &[(&str, &str)] = &[
    // preloads
    (
        "start/globals.ts.stub",
        include_str!("../stubs/start/globals.ts.stub"),
    ),
    // views: components
    (
        "views/components/forms/input.edge.stub",
        include_str!("../stubs/views/components/forms/input.edge.stub"),
    ),
    (
        "views/components/forms/button.edge.stub",
        include_str!("../stubs/views/components/forms/button.edge.stub"),
    ),
    (
        "views/components/toast.edge.stub",
        include_str!("../stubs/views/components/toast.edge.stub"),
    ),
    // views: pages
    (
        "views/pages/welcome.edge.stub",
        include_str!("../stubs/views/pages/welcome.edge.stub"),
    ),
    (
        "views/pages/auth/login.edge.stub",
        include_str!("../stubs/views/pages/auth/login.edge.stub"),
    ),
    (
        "views/pages/auth/register.edge.stub",
        include_str!("../stubs/views/pages/auth/register.edge.stub"),
    ),
    (
        "views/pages/auth/forgot_password.edge.stub",
        include_str!("../stubs/views/pages/auth/forgot_password.edge.stub"),
    ),
    (
        "views/pages/settings/account.edge.stub",
        include_str!("../stubs/views/pages/settings/account.edge.stub"),
    ),
    (
        "views/pages/settings/profile.edge.stub",
        include_str!("../stubs/views/pages/settings/profile.edge.stub"),
    ),
    // views: emails
    (
        "views/emails/account/email_changed.edge.stub",
        include_str!("../stubs/views/emails/account/email_changed.edge.stub"),
    ),
    (
        "views/emails/auth/reset_password.edge.stub",
        include_str!("../stubs/views/emails/auth/reset_password.edge.stub"),
    ),
    // migrations
    (
        "migrations/create_email_histories_table.ts.stub",
        include_str!("../stubs/migrations/create_email_histories_table.ts.stub"),
    ),
    (
        "migrations/create_password_reset_tokens_table.ts.stub",
        include_str!("../stubs/migrations/create_password_reset_tokens_table.ts.stub"),
    ),
    (
        "migrations/create_remember_me_tokens_table.ts.stub",
        include_str!("../stubs/migrations/create_remember_me_tokens_table.ts.stub"),
    ),
    // models
    (
        "models/email_history.ts.stub",
        include_str!("../stubs/models/email_history.ts.stub"),
    ),
    (
        "models/password_reset_token.ts.stub",
        include_str!("../stubs/models/password_reset_token.ts.stub"),
    ),
    // validators
    (
        "validators/auth.ts.stub",
        include_str!("../stubs/validators/auth.ts.stub"),
    ),
    (
        "validators/settings.ts.stub",
        include_str!("../stubs/validators/settings.ts.stub"),
    ),
    // services
    (
        "services/edge_form_service.ts.stub",
        include_str!("../stubs/services/edge_form_service.ts.stub"),
    ),
    // controllers
    (
        "controllers/auth/forgot_password_controller.ts.stub",
        include_str!("../stubs/controllers/auth/forgot_password_controller.ts.stub"),
    ),
    (
        "controllers/auth/login_controller.ts.stub",
        include_str!("../stubs/controllers/auth/login_controller.ts.stub"),
    ),
    (
        "controllers/auth/logout_controller.ts.stub",
        include_str!("../stubs/controllers/auth/logout_controller.ts.stub"),
    ),
    (
        "controllers/auth/register_controller.ts.stub",
        include_str!("../stubs/controllers/auth/register_controller.ts.stub"),
    ),
    (
        "controllers/settings/account_controller.ts.stub",
        include_str!("../stubs/controllers/settings/account_controller.ts.stub"),
    ),
    (
        "controllers/settings/profile_controller.ts.stub",
        include_str!("../stubs/controllers/settings/profile_controller.ts.stub"),
    ),
];

/// The compiled-in implementation of the [`StubSource`] port.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedStubs;

impl EmbeddedStubs {
    pub fn new() -> Self {
        Self
    }
}

impl StubSource for EmbeddedStubs {
    fn read(&self, rel: &str) -> GraftResult<&str> {
        STUBS
            .iter()
            .find(|(path, _)| *path == rel)
            .map(|(_, content)| *content)
            .ok_or_else(|| {
                ApplicationError::StubMissing {
                    rel: rel.to_string(),
                }
                .into()
            })
    }

    fn list(&self, prefix: &str) -> Vec<&str> {
        let dir_prefix = format!("{}/", prefix.trim_end_matches('/'));
        STUBS
            .iter()
            .map(|(path, _)| *path)
            .filter(|path| path.starts_with(&dir_prefix) || *path == prefix)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stub_has_the_suffix_and_content() {
        for (path, content) in STUBS {
            assert!(path.ends_with(".stub"), "bad stub name: {path}");
            assert!(!content.is_empty(), "empty stub: {path}");
        }
    }

    #[test]
    fn read_known_stub() {
        let stubs = EmbeddedStubs::new();
        let content = stubs.read("models/email_history.ts.stub").unwrap();
        assert!(content.contains("EmailHistory"));
    }

    #[test]
    fn read_unknown_stub_errors() {
        let stubs = EmbeddedStubs::new();
        assert!(stubs.read("models/nope.ts.stub").is_err());
    }

    #[test]
    fn list_is_prefix_scoped() {
        let stubs = EmbeddedStubs::new();
        let components = stubs.list("views/components");
        assert_eq!(components.len(), 3);
        assert!(components.iter().all(|p| p.starts_with("views/components/")));

        // A prefix must match whole path segments.
        assert!(stubs.list("views/comp").is_empty());
    }
}
