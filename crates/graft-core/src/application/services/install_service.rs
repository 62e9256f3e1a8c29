//! Install Service - the scaffold orchestrator.
//!
//! A fixed, ordered list of steps, each independently idempotent and
//! independently resumable. Steps run strictly sequentially; a fatal
//! failure aborts the remaining steps with no rollback - prior effects
//! persist and the next run converges by skipping whatever already landed.
//!
//! Error policy per step:
//! - patch target absent from the project -> warning, step skipped
//! - malformed target (missing default export / container) -> fatal
//! - I/O and installer failures -> fatal, surfaced verbatim
//! - "already installed" probes -> silent no-ops

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, PackageInstaller, Prompt, SourceHandle, SourcePatcher, StubSource},
        services::{materializer::Materializer, text_patcher::TextPatcher},
    },
    domain::{
        ActionRecord, ConstDecl, Edit, ImportSpec, MethodSpec, PackageSpec, Position,
        PropertySpec, RunReport, StubCategory, StubUnit,
    },
    error::GraftResult,
};

/// The npm package the add-on ships as; offered for removal once the
/// scaffold is in place.
pub const ADDON_PACKAGE: &str = "@graft/jumpstart";

/// Framework providers that must be configured before the add-on works,
/// with the package that provides each and a one-line reason shown to the
/// user when it is missing.
const REQUIRED_PROVIDERS: &[(&str, &str, &str)] = &[
    (
        "@adonisjs/vite/vite_provider",
        "@adonisjs/vite",
        "Vite is needed to bundle tailwind assets",
    ),
    (
        "@adonisjs/core/providers/vinejs_provider",
        "vinejs",
        "VineJS is needed for the add-on's validations",
    ),
    (
        "@adonisjs/core/providers/edge_provider",
        "edge",
        "EdgeJS renders the add-on's pages & emails",
    ),
    (
        "@adonisjs/session/session_provider",
        "@adonisjs/session",
        "Session is needed for authentication & toast messaging",
    ),
    (
        "@adonisjs/shield/shield_provider",
        "@adonisjs/shield",
        "Shield is recommended for CSRF & other protections",
    ),
    (
        "@adonisjs/auth/auth_provider",
        "@adonisjs/auth",
        "The add-on wires authentication scaffolding",
    ),
    (
        "@adonisjs/lucid/database_provider",
        "@adonisjs/lucid",
        "Lucid is the ORM behind the add-on's models & queries",
    ),
    (
        "@adonisjs/mail/mail_provider",
        "@adonisjs/mail",
        "Mail backs the forgot-password & email-change flows",
    ),
];

/// Single-file stubs, category by category. Views are directory copies and
/// handled separately.
const FILE_STUBS: &[(StubCategory, &str)] = &[
    (
        StubCategory::Migrations,
        "create_email_histories_table.ts.stub",
    ),
    (
        StubCategory::Migrations,
        "create_password_reset_tokens_table.ts.stub",
    ),
    (
        StubCategory::Migrations,
        "create_remember_me_tokens_table.ts.stub",
    ),
    (StubCategory::Models, "email_history.ts.stub"),
    (StubCategory::Models, "password_reset_token.ts.stub"),
    (StubCategory::Validators, "auth.ts.stub"),
    (StubCategory::Validators, "settings.ts.stub"),
    (StubCategory::Services, "edge_form_service.ts.stub"),
    (StubCategory::Controllers, "auth/forgot_password_controller.ts.stub"),
    (StubCategory::Controllers, "auth/login_controller.ts.stub"),
    (StubCategory::Controllers, "auth/logout_controller.ts.stub"),
    (StubCategory::Controllers, "auth/register_controller.ts.stub"),
    (StubCategory::Controllers, "settings/account_controller.ts.stub"),
    (StubCategory::Controllers, "settings/profile_controller.ts.stub"),
];

/// View directories copied recursively.
const VIEW_DIRS: &[&str] = &["components", "pages", "emails"];

/// Marker gating the route-statement block: present once the block landed.
const ROUTES_MARKER: &str = "settings.profile.update";

/// The route statements appended to the route table. Empty entries render
/// as blank separator lines and are not containment-checked.
const ROUTE_STATEMENTS: &[&str] = &[
    "router.on('/welcome').render('pages/welcome').as('welcome')",
    "",
    "//* AUTH -> LOGIN, REGISTER, LOGOUT",
    "router.get('/login', [LoginController, 'show']).as('auth.login.show').use(middleware.guest())",
    "router.post('/login', [LoginController, 'store']).as('auth.login.store').use([middleware.guest()])",
    "router.get('/register', [RegisterController, 'show']).as('auth.register.show').use(middleware.guest())",
    "router.post('/register', [RegisterController, 'store']).as('auth.register.store').use([middleware.guest()])",
    "router.post('/logout', [LogoutController, 'handle']).as('auth.logout').use(middleware.auth())",
    "",
    "//* AUTH -> FORGOT PASSWORD",
    "router.get('/forgot-password', [ForgotPasswordController, 'index']).as('auth.password.index').use([middleware.guest()])",
    "router.post('/forgot-password', [ForgotPasswordController, 'send']).as('auth.password.send').use([middleware.guest()])",
    "router.get('/forgot-password/reset/:value', [ForgotPasswordController, 'reset']).as('auth.password.reset').use([middleware.guest()])",
    "router.post('/forgot-password/reset', [ForgotPasswordController, 'update']).as('auth.password.update').use([middleware.guest()])",
    "",
    "//* SETTINGS -> ACCOUNT",
    "router.get('/settings/account', [AccountController, 'index']).as('settings.account').use(middleware.auth())",
    "router.put('/settings/account/email', [AccountController, 'updateEmail']).as('settings.account.email').use(middleware.auth())",
    "router.delete('/settings/account', [AccountController, 'destroy']).as('settings.account.destroy').use(middleware.auth())",
    "",
    "//* SETTINGS -> PROFILE",
    "router.get('/settings/profile', [ProfileController, 'index']).as('settings.profile').use(middleware.auth())",
    "router.put('/settings/profile', [ProfileController, 'update']).as('settings.profile.update').use(middleware.auth())",
];

/// Metadata for one orchestrator step, surfaced by `graft steps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StepInfo {
    pub name: &'static str,
    pub summary: &'static str,
}

/// The fixed step sequence, in execution order.
pub const STEPS: &[StepInfo] = &[
    StepInfo {
        name: "verify-prerequisites",
        summary: "Check framework providers and install the add-on's packages",
    },
    StepInfo {
        name: "define-env",
        summary: "Register APP_URL and its validation schema entry",
    },
    StepInfo {
        name: "enable-method-spoofing",
        summary: "Flip allowMethodSpoofing to true in config/app.ts",
    },
    StepInfo {
        name: "register-preloads",
        summary: "Materialize start/globals.ts and register it as a preload",
    },
    StepInfo {
        name: "copy-templates",
        summary: "Copy views, models, migrations, validators, services and controllers",
    },
    StepInfo {
        name: "wire-routes",
        summary: "Add controller declarations and routes to the route table",
    },
    StepInfo {
        name: "augment-user-model",
        summary: "Add auth methods and supporting imports to the User model",
    },
    StepInfo {
        name: "tailwind-css",
        summary: "Patch the CSS entry file and register the tailwind vite plugin",
    },
    StepInfo {
        name: "self-uninstall",
        summary: "Offer to remove the add-on package once everything is in place",
    },
];

/// Options the CLI resolves from flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Skip everything that shells out to the package manager.
    pub skip_install: bool,
}

/// Main orchestrator. Owns the injected adapters plus the run-scoped
/// content cache; dropped at run end.
pub struct InstallService {
    fs: Box<dyn Filesystem>,
    stubs: Box<dyn StubSource>,
    installer: Box<dyn PackageInstaller>,
    prompt: Box<dyn Prompt>,
    patcher: Box<dyn SourcePatcher>,
    project_root: PathBuf,
    options: InstallOptions,
    text: TextPatcher,
}

impl InstallService {
    pub fn new(
        fs: Box<dyn Filesystem>,
        stubs: Box<dyn StubSource>,
        installer: Box<dyn PackageInstaller>,
        prompt: Box<dyn Prompt>,
        patcher: Box<dyn SourcePatcher>,
        project_root: impl Into<PathBuf>,
        options: InstallOptions,
    ) -> Self {
        Self {
            fs,
            stubs,
            installer,
            prompt,
            patcher,
            project_root: project_root.into(),
            options,
            text: TextPatcher::new(),
        }
    }

    /// Packages the add-on installs into the user's project so they can
    /// update them as they see fit.
    pub fn addon_packages() -> Vec<PackageSpec> {
        vec![
            PackageSpec::dev("tailwindcss"),
            PackageSpec::dev("@tailwindcss/vite"),
            PackageSpec::runtime("edge-iconify"),
            PackageSpec::runtime("@iconify-json/ph"),
            PackageSpec::runtime("@iconify-json/svg-spinners"),
        ]
    }

    /// Run every step in order. Returns the action log; the second run
    /// against a configured project reports zero mutations.
    #[instrument(skip_all, fields(project = %self.project_root.display()))]
    pub fn run(&mut self) -> GraftResult<RunReport> {
        let mut report = RunReport::new();
        info!("starting install run");

        self.verify_prerequisites(&mut report)?;
        self.define_env(&mut report)?;
        self.enable_method_spoofing(&mut report)?;
        self.register_preloads(&mut report)?;
        self.copy_templates(&mut report)?;
        self.wire_routes(&mut report)?;
        self.augment_user_model(&mut report)?;
        self.tailwind_css(&mut report)?;
        self.self_uninstall(&mut report)?;

        info!(
            mutations = report.mutation_count(),
            warnings = report.warnings.len(),
            "install run finished"
        );
        Ok(report)
    }

    // ── step 1 ────────────────────────────────────────────────────────────

    fn verify_prerequisites(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let rc_path = self.project_root.join("adonisrc.ts");

        match self.patcher.open(self.fs.as_ref(), &rc_path) {
            Ok(rc) => {
                for (provider, package, why) in REQUIRED_PROVIDERS.iter().copied() {
                    if rc.config_array_contains("providers", provider)? {
                        continue;
                    }
                    info!(package, "{why}");
                    if self.options.skip_install {
                        report.warn(format!(
                            "missing provider {provider}; run `node ace add {package}` manually"
                        ));
                        continue;
                    }
                    self.installer.configure(package)?;
                }
            }
            Err(e) if e.is_missing_source() => {
                warn!("adonisrc.ts not found, skipping provider checks");
                report.warn("skipped provider checks, adonisrc.ts not found");
            }
            Err(e) => return Err(e),
        }

        if self.options.skip_install {
            report.warn("skipped package installation (--skip-install)");
            return Ok(());
        }
        self.installer.install(&Self::addon_packages())
    }

    // ── step 2 ────────────────────────────────────────────────────────────

    fn define_env(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let env_path = self.project_root.join(".env");
        let edits = [Edit::insert_if_missing(
            "APP_URL=",
            "APP_URL=http://localhost:3333",
            Position::Append,
        )?];
        if self.text.patch_file(self.fs.as_ref(), &env_path, &edits)? {
            report.record(ActionRecord::update(".env", "registered APP_URL"));
        }

        let schema_path = self.project_root.join("start/env.ts");
        let mut handle = match self.patcher.open(self.fs.as_ref(), &schema_path) {
            Ok(handle) => handle,
            Err(e) if e.is_missing_source() => {
                report.warn("skipped env validation, start/env.ts not found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if handle.add_config_object_property("APP_URL", "Env.schema.string()")? {
            self.save(&schema_path, handle.as_ref())?;
            report.record(ActionRecord::update(
                "start/env.ts",
                "added APP_URL validation",
            ));
        }
        Ok(())
    }

    // ── step 3 ────────────────────────────────────────────────────────────

    fn enable_method_spoofing(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let path = self.project_root.join("config/app.ts");
        if self.text.peek(self.fs.as_ref(), &path)?.is_empty() {
            report.warn("skipped method spoofing, config/app.ts not found");
            return Ok(());
        }

        // Purely textual on purpose: a hand-reverted value is re-flipped on
        // the next run because detection keys on the literal default.
        let edits = [Edit::replace_once(
            "allowMethodSpoofing: false",
            "allowMethodSpoofing: true",
        )?];
        if self.text.patch_file(self.fs.as_ref(), &path, &edits)? {
            report.record(ActionRecord::update(
                "config/app.ts",
                "enabled HTTP method spoofing",
            ));
        }
        Ok(())
    }

    // ── step 4 ────────────────────────────────────────────────────────────

    fn register_preloads(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let unit = StubUnit::file(StubCategory::Preloads, "globals.ts.stub")?;
        let materializer = Materializer::new(self.stubs.as_ref(), self.fs.as_ref());
        let (dest, outcome) = materializer.materialize_unit(&unit, &self.project_root)?;
        report.record_copy(&self.display_path(&dest), &outcome);

        let rc_path = self.project_root.join("adonisrc.ts");
        let mut handle = match self.patcher.open(self.fs.as_ref(), &rc_path) {
            Ok(handle) => handle,
            Err(e) if e.is_missing_source() => {
                report.warn("skipped preload registration, adonisrc.ts not found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if handle.append_config_array_entry(
            "preloads",
            "() => import('#start/globals')",
            "#start/globals",
        )? {
            self.save(&rc_path, handle.as_ref())?;
            report.record(ActionRecord::update(
                "adonisrc.ts",
                "registered #start/globals preload",
            ));
        }
        Ok(())
    }

    // ── step 5 ────────────────────────────────────────────────────────────

    fn copy_templates(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let materializer = Materializer::new(self.stubs.as_ref(), self.fs.as_ref());

        for dir in VIEW_DIRS {
            let dest_dir = self
                .project_root
                .join(StubCategory::Views.dest_dir())
                .join(dir);
            let prefix = format!("{}/{}", StubCategory::Views.stub_prefix(), dir);
            for (dest, outcome) in materializer.materialize_dir(&prefix, &dest_dir)? {
                report.record_copy(&self.display_path(&dest), &outcome);
            }
        }

        for (category, rel) in FILE_STUBS {
            let unit = StubUnit::file(*category, *rel)?;
            let (dest, outcome) = materializer.materialize_unit(&unit, &self.project_root)?;
            report.record_copy(&self.display_path(&dest), &outcome);
        }
        Ok(())
    }

    // ── step 6 ────────────────────────────────────────────────────────────

    fn wire_routes(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let path = self.project_root.join("start/routes.ts");
        let mut handle = match self.patcher.open(self.fs.as_ref(), &path) {
            Ok(handle) => handle,
            Err(e) if e.is_missing_source() => {
                warn!("routes file not found");
                report.warn("skipped route updates, routes file not found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        handle.add_import(&ImportSpec::named("#start/kernel", ["middleware"])?);

        handle.add_consts_after_imports(&[
            ConstDecl::new(
                "LoginController",
                "() => import('#controllers/auth/login_controller')",
            ),
            ConstDecl::new(
                "LogoutController",
                "() => import('#controllers/auth/logout_controller')",
            ),
            ConstDecl::new(
                "RegisterController",
                "() => import('#controllers/auth/register_controller')",
            ),
            ConstDecl::new(
                "ForgotPasswordController",
                "() => import('#controllers/auth/forgot_password_controller')",
            ),
            ConstDecl::new(
                "ProfileController",
                "() => import('#controllers/settings/profile_controller')",
            ),
            ConstDecl::new(
                "AccountController",
                "() => import('#controllers/settings/account_controller')",
            ),
        ])?;

        handle.append_statements_if_absent(ROUTES_MARKER, ROUTE_STATEMENTS);

        if handle.changed() {
            self.save(&path, handle.as_ref())?;
            report.record(ActionRecord::update(
                "start/routes.ts",
                "added auth & settings routes",
            ));
        }
        Ok(())
    }

    // ── step 7 ────────────────────────────────────────────────────────────

    fn augment_user_model(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let path = self.project_root.join("app/models/user.ts");
        let mut handle = match self.patcher.open(self.fs.as_ref(), &path) {
            Ok(handle) => handle,
            Err(e) if e.is_missing_source() => {
                warn!("user model not found");
                report.warn("skipped user model updates, user model not found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if !handle.has_class("User") {
            warn!("User class not found in app/models/user.ts");
            report.warn("skipped user model updates, user model not found");
            return Ok(());
        }

        handle.add_class_property(
            "User",
            &PropertySpec::new(
                "rememberMeTokens",
                "DbRememberMeTokensProvider.forModel(User)",
            )
            .staticized(),
        )?;

        for method in Self::user_model_methods() {
            handle.add_class_method("User", &method)?;
        }

        for import in Self::user_model_imports()? {
            handle.add_import(&import);
        }

        if handle.changed() {
            self.save(&path, handle.as_ref())?;
            report.record(ActionRecord::update(
                "app/models/user.ts",
                "added auth methods",
            ));
        }
        Ok(())
    }

    fn user_model_methods() -> Vec<MethodSpec> {
        vec![
            MethodSpec::new("login")
                .staticized()
                .asynced()
                .param("auth", "Authenticator<Authenticators>")
                .param("{ email, password, remember }", "Infer<typeof loginValidator>")
                .body_lines([
                    "const user = await this.verifyCredentials(email, password)",
                    "await auth.use('web').login(user, remember)",
                    "return user",
                ]),
            MethodSpec::new("register")
                .staticized()
                .asynced()
                .param("auth", "Authenticator<Authenticators>")
                .param("data", "Infer<typeof registerValidator>")
                .body_lines([
                    "const user = await this.create(data)",
                    "await auth.use('web').login(user)",
                    "return user",
                ]),
            MethodSpec::new("logout")
                .staticized()
                .asynced()
                .param("auth", "Authenticator<Authenticators>")
                .body_lines(["await auth.use('web').logout()"]),
            MethodSpec::new("updateEmail")
                .asynced()
                .param("data", "Infer<typeof updateEmailValidator>")
                .body_lines([
                    "const emailOld = this.email",
                    "",
                    "await User.verifyCredentials(emailOld, data.password)",
                    "",
                    "await db.transaction(async (trx) => {",
                    "  this.useTransaction(trx)",
                    "  await this.merge({ email: data.email }).save()",
                    "  await EmailHistory.create({ userId: this.id, emailNew: data.email, emailOld }, { client: trx })",
                    "})",
                    "",
                    "await mail.sendLater((message) => {",
                    "  message",
                    "    .to(emailOld)",
                    "    .subject(`Your ${app.appName} email has been successfully changed`)",
                    "    .htmlView('emails/account/email_changed', { user: this })",
                    "})",
                ]),
        ]
    }

    fn user_model_imports() -> GraftResult<Vec<ImportSpec>> {
        Ok(vec![
            ImportSpec::named("@adonisjs/auth", ["Authenticator"])?,
            ImportSpec::named("@adonisjs/auth/types", ["Authenticators"])?,
            ImportSpec::named("@vinejs/vine/types", ["Infer"])?,
            ImportSpec::named("#validators/auth", ["loginValidator", "registerValidator"])?,
            ImportSpec::named("#validators/settings", ["updateEmailValidator"])?,
            ImportSpec::named("@adonisjs/auth/session", ["DbRememberMeTokensProvider"])?,
            ImportSpec::default("db", "@adonisjs/lucid/services/db")?,
            ImportSpec::default("mail", "@adonisjs/mail/services/main")?,
            ImportSpec::default("app", "@adonisjs/core/services/app")?,
            ImportSpec::default("EmailHistory", "#models/email_history")?,
        ])
    }

    // ── step 8 ────────────────────────────────────────────────────────────

    fn tailwind_css(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let css_path = self.project_root.join("resources/css/app.css");
        let default_reset = "* {\n  margin: 0;\n  padding: 0;\n}";
        let edits = [
            Edit::insert_if_missing(
                "[x-cloak]",
                "[x-cloak] { display: none; }",
                Position::Prepend,
            )?,
            Edit::insert_if_missing(
                "@import \"tailwindcss\"",
                "@import \"tailwindcss\";\n@source \"../views\";\n",
                Position::Prepend,
            )?,
            Edit::replace_once(default_reset, "")?,
        ];
        if self.text.patch_file(self.fs.as_ref(), &css_path, &edits)? {
            report.record(ActionRecord::update(
                "resources/css/app.css",
                "tailwind entry styles",
            ));
        }

        let vite_path = self.project_root.join("vite.config.ts");
        let mut handle = match self.patcher.open(self.fs.as_ref(), &vite_path) {
            Ok(handle) => handle,
            Err(e) if e.is_missing_source() => {
                report.warn("skipped vite plugin registration, vite.config.ts not found");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        handle.add_import(&ImportSpec::default("tailwindcss", "@tailwindcss/vite")?);
        handle.append_config_array_entry("plugins", "tailwindcss()", "tailwindcss()")?;

        if handle.changed() {
            self.save(&vite_path, handle.as_ref())?;
            report.record(ActionRecord::update(
                "vite.config.ts",
                "registered tailwindcss plugin",
            ));
        }
        Ok(())
    }

    // ── step 9 ────────────────────────────────────────────────────────────

    fn self_uninstall(&mut self, report: &mut RunReport) -> GraftResult<()> {
        let question = format!("We're all done here, remove {ADDON_PACKAGE} from the project?");
        if !self.prompt.confirm(&question)? {
            return Ok(());
        }

        self.installer.uninstall(ADDON_PACKAGE)?;
        report.record(ActionRecord::update(
            "package.json",
            format!("removed {ADDON_PACKAGE}"),
        ));
        Ok(())
    }

    // ── helpers ───────────────────────────────────────────────────────────

    /// Write a patched handle back, once, and keep the run cache coherent.
    fn save(&mut self, path: &Path, handle: &dyn SourceHandle) -> GraftResult<()> {
        self.fs.write_file(path, handle.text())?;
        self.text.store(path, handle.text().to_string());
        Ok(())
    }

    /// Paths in the action log are project-relative.
    fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.project_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_are_unique_and_ordered() {
        let names: Vec<_> = STEPS.iter().map(|s| s.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names.len(), 9);
        assert_eq!(sorted.len(), names.len());
        assert_eq!(names.first(), Some(&"verify-prerequisites"));
        assert_eq!(names.last(), Some(&"self-uninstall"));
    }

    #[test]
    fn addon_packages_split_dev_and_runtime() {
        let packages = InstallService::addon_packages();
        assert_eq!(packages.iter().filter(|p| p.dev).count(), 2);
        assert_eq!(packages.iter().filter(|p| !p.dev).count(), 3);
    }

    #[test]
    fn routes_marker_is_produced_by_the_block_itself() {
        // The gate must close after the first application.
        assert!(
            ROUTE_STATEMENTS
                .iter()
                .any(|statement| statement.contains(ROUTES_MARKER))
        );
    }

    #[test]
    fn required_providers_name_distinct_packages() {
        let mut packages: Vec<_> = REQUIRED_PROVIDERS.iter().map(|(_, p, _)| *p).collect();
        packages.sort_unstable();
        packages.dedup();
        assert_eq!(packages.len(), REQUIRED_PROVIDERS.len());
    }

    #[test]
    fn user_model_imports_are_keyed_by_distinct_modules() {
        let imports = InstallService::user_model_imports().unwrap();
        let mut modules: Vec<_> = imports.iter().map(|i| i.module.clone()).collect();
        modules.sort();
        modules.dedup();
        assert_eq!(modules.len(), imports.len());
    }
}
