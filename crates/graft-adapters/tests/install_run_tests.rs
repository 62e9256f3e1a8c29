//! Full-run tests: the orchestrator against an in-memory project.
//!
//! The fixture mirrors a stock AdonisJS app. The central property under
//! test is convergence: the second run performs zero mutations and leaves
//! every file byte-identical.

use std::path::{Path, PathBuf};

use graft_adapters::{
    EmbeddedStubs, MemoryFilesystem, RecordingInstaller, ScriptedPrompt, TsPatcher,
};
use graft_core::application::{InstallOptions, InstallService};

const RC_TS: &str = r#"import { defineConfig } from '@adonisjs/core/app'

export default defineConfig({
  typescript: true,
  providers: [
    () => import('@adonisjs/core/providers/app_provider'),
    () => import('@adonisjs/core/providers/hash_provider'),
    () => import('@adonisjs/vite/vite_provider'),
    () => import('@adonisjs/core/providers/vinejs_provider'),
    () => import('@adonisjs/core/providers/edge_provider'),
    () => import('@adonisjs/session/session_provider'),
    () => import('@adonisjs/shield/shield_provider'),
    () => import('@adonisjs/auth/auth_provider'),
    () => import('@adonisjs/lucid/database_provider'),
    () => import('@adonisjs/mail/mail_provider'),
  ],
  preloads: [
    () => import('#start/routes'),
    () => import('#start/kernel'),
  ],
})
"#;

const ENV_FILE: &str = "TZ=UTC\nPORT=3333\nAPP_KEY=secret\n";

const ENV_TS: &str = r#"import { Env } from '@adonisjs/core/env'

export default await Env.create(new URL('../', import.meta.url), {
  NODE_ENV: Env.schema.enum(['development', 'production', 'test'] as const),
  PORT: Env.schema.number(),
  APP_KEY: Env.schema.string(),
})
"#;

const APP_CONFIG_TS: &str = r#"import { defineConfig } from '@adonisjs/core/http'

export default defineConfig({
  allowMethodSpoofing: false,
  useAsyncLocalStorage: false,
})
"#;

const ROUTES_TS: &str = r#"import router from '@adonisjs/core/services/router'

router.on('/').render('pages/home')
"#;

const USER_MODEL_TS: &str = r#"import { DateTime } from 'luxon'
import hash from '@adonisjs/core/services/hash'
import { compose } from '@adonisjs/core/helpers'
import { BaseModel, column } from '@adonisjs/lucid/orm'
import { withAuthFinder } from '@adonisjs/auth/mixins/lucid'

const AuthFinder = withAuthFinder(() => hash.use('scrypt'), {
  uids: ['email'],
  passwordColumnName: 'password',
})

export default class User extends compose(BaseModel, AuthFinder) {
  @column({ isPrimary: true })
  declare id: number

  @column()
  declare email: string

  @column({ serializeAs: null })
  declare password: string
}
"#;

const VITE_CONFIG_TS: &str = r#"import { defineConfig } from 'vite'
import adonisjs from '@adonisjs/vite/client'

export default defineConfig({
  plugins: [
    adonisjs({ entrypoints: ['resources/css/app.css', 'resources/js/app.js'] }),
  ],
})
"#;

const APP_CSS: &str = "* {\n  margin: 0;\n  padding: 0;\n}\nbody { font-family: sans-serif; }\n";

fn root() -> PathBuf {
    PathBuf::from("proj")
}

fn seeded_project() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    fs.seed_file("proj/adonisrc.ts", RC_TS);
    fs.seed_file("proj/.env", ENV_FILE);
    fs.seed_file("proj/start/env.ts", ENV_TS);
    fs.seed_file("proj/start/routes.ts", ROUTES_TS);
    fs.seed_file("proj/config/app.ts", APP_CONFIG_TS);
    fs.seed_file("proj/app/models/user.ts", USER_MODEL_TS);
    fs.seed_file("proj/vite.config.ts", VITE_CONFIG_TS);
    fs.seed_file("proj/resources/css/app.css", APP_CSS);
    fs
}

fn service_with(
    fs: &MemoryFilesystem,
    installer: &RecordingInstaller,
    prompt: ScriptedPrompt,
    options: InstallOptions,
) -> InstallService {
    InstallService::new(
        Box::new(fs.clone()),
        Box::new(EmbeddedStubs::new()),
        Box::new(installer.clone()),
        Box::new(prompt),
        Box::new(TsPatcher::new()),
        root(),
        options,
    )
}

fn service(fs: &MemoryFilesystem) -> InstallService {
    service_with(
        fs,
        &RecordingInstaller::new(),
        ScriptedPrompt::always_no(),
        InstallOptions::default(),
    )
}

// ── first run wires everything ────────────────────────────────────────────────

#[test]
fn first_run_configures_the_project() {
    let fs = seeded_project();
    let report = service(&fs).run().unwrap();

    assert!(report.mutation_count() > 0);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    // Flag flip (allowMethodSpoofing false -> true).
    let app_config = fs.file(Path::new("proj/config/app.ts")).unwrap();
    assert!(app_config.contains("allowMethodSpoofing: true"));
    assert!(!app_config.contains("allowMethodSpoofing: false"));

    // Env registration, keyed by variable name.
    let env = fs.file(Path::new("proj/.env")).unwrap();
    assert!(env.contains("APP_URL=http://localhost:3333"));
    let env_ts = fs.file(Path::new("proj/start/env.ts")).unwrap();
    assert!(env_ts.contains("APP_URL: Env.schema.string()"));

    // Preload stub + rc registration.
    assert!(fs.file(Path::new("proj/start/globals.ts")).is_some());
    let rc = fs.file(Path::new("proj/adonisrc.ts")).unwrap();
    assert!(rc.contains("() => import('#start/globals')"));

    // Routes: import, lazy controller consts, statement block.
    let routes = fs.file(Path::new("proj/start/routes.ts")).unwrap();
    assert!(routes.contains("import { middleware } from '#start/kernel'"));
    assert!(routes.contains("const LoginController"));
    assert!(routes.contains("settings.profile.update"));

    // User model: property, methods, imports.
    let user = fs.file(Path::new("proj/app/models/user.ts")).unwrap();
    assert!(user.contains("static rememberMeTokens"));
    assert!(user.contains("static async login"));
    assert!(user.contains("async updateEmail"));
    assert!(user.contains("import db from '@adonisjs/lucid/services/db'"));

    // CSS entry and vite plugin.
    let css = fs.file(Path::new("proj/resources/css/app.css")).unwrap();
    assert!(css.starts_with("@import \"tailwindcss\";"));
    assert!(css.contains("[x-cloak] { display: none; }"));
    assert!(!css.contains("margin: 0"));
    assert!(css.contains("font-family: sans-serif"));
    let vite = fs.file(Path::new("proj/vite.config.ts")).unwrap();
    assert!(vite.contains("import tailwindcss from '@tailwindcss/vite'"));
    assert!(vite.contains("tailwindcss()"));

    // Whole-file scaffolds landed.
    assert!(
        fs.file(Path::new("proj/app/controllers/auth/login_controller.ts"))
            .is_some()
    );
    assert!(
        fs.file(Path::new(
            "proj/database/migrations/create_email_histories_table.ts"
        ))
        .is_some()
    );
    assert!(
        fs.file(Path::new("proj/resources/views/pages/auth/login.edge"))
            .is_some()
    );
}

// ── idempotence ───────────────────────────────────────────────────────────────

#[test]
fn second_run_is_a_byte_identical_noop() {
    let fs = seeded_project();

    service(&fs).run().unwrap();
    let after_first = fs.snapshot();

    let report = service(&fs).run().unwrap();

    assert!(report.is_noop(), "second run must not mutate anything");
    assert_eq!(after_first, fs.snapshot());
}

#[test]
fn flag_flip_is_not_reapplied_to_flipped_content() {
    let fs = seeded_project();
    service(&fs).run().unwrap();

    let flipped = fs.file(Path::new("proj/config/app.ts")).unwrap();
    service(&fs).run().unwrap();
    assert_eq!(fs.file(Path::new("proj/config/app.ts")).unwrap(), flipped);
}

// ── non-destructive materialization ───────────────────────────────────────────

#[test]
fn existing_user_files_are_never_overwritten() {
    let fs = seeded_project();
    let custom = "// my own email history model\nexport default class EmailHistory {}\n";
    fs.seed_file("proj/app/models/email_history.ts", custom);

    let report = service(&fs).run().unwrap();

    assert_eq!(
        fs.file(Path::new("proj/app/models/email_history.ts"))
            .unwrap(),
        custom
    );
    let skip = report
        .actions
        .iter()
        .find(|a| a.path == Path::new("app/models/email_history.ts"))
        .expect("a record for the skipped model");
    assert_eq!(
        skip.to_string(),
        "skip app/models/email_history.ts (already exists)"
    );
}

// ── empty css scenario ────────────────────────────────────────────────────────

#[test]
fn absent_css_file_is_created_with_both_blocks() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("proj/adonisrc.ts", RC_TS);
    fs.seed_file("proj/.env", ENV_FILE);
    fs.seed_file("proj/start/env.ts", ENV_TS);
    fs.seed_file("proj/start/routes.ts", ROUTES_TS);
    fs.seed_file("proj/config/app.ts", APP_CONFIG_TS);
    fs.seed_file("proj/app/models/user.ts", USER_MODEL_TS);
    fs.seed_file("proj/vite.config.ts", VITE_CONFIG_TS);

    service(&fs).run().unwrap();

    let css = fs.file(Path::new("proj/resources/css/app.css")).unwrap();
    // Operations are declared cloak-first, import-second; both prepend, so
    // the import block ends up on top. Exactly one trailing newline.
    assert_eq!(
        css,
        "@import \"tailwindcss\";\n@source \"../views\";\n[x-cloak] { display: none; }\n"
    );
}

// ── degraded projects ─────────────────────────────────────────────────────────

#[test]
fn missing_routes_and_model_are_warnings_not_failures() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("proj/adonisrc.ts", RC_TS);
    fs.seed_file("proj/.env", ENV_FILE);
    fs.seed_file("proj/start/env.ts", ENV_TS);
    fs.seed_file("proj/config/app.ts", APP_CONFIG_TS);
    fs.seed_file("proj/vite.config.ts", VITE_CONFIG_TS);
    fs.seed_file("proj/resources/css/app.css", APP_CSS);

    let report = service(&fs).run().unwrap();

    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("routes file not found"))
    );
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("user model not found"))
    );
    // The rest of the run still happened.
    assert!(fs.file(Path::new("proj/start/globals.ts")).is_some());
}

#[test]
fn malformed_vite_config_aborts_the_run() {
    let fs = seeded_project();
    fs.seed_file("proj/vite.config.ts", "const config = { plugins: [] }\n");

    let err = service(&fs).run().unwrap_err();
    assert!(err.to_string().contains("default export"));
}

// ── installer delegation ──────────────────────────────────────────────────────

#[test]
fn missing_providers_are_delegated_to_the_installer() {
    let fs = seeded_project();
    // Drop two providers from the rc file.
    let thinned = RC_TS
        .replace("    () => import('@adonisjs/mail/mail_provider'),\n", "")
        .replace(
            "    () => import('@adonisjs/shield/shield_provider'),\n",
            "",
        );
    fs.seed_file("proj/adonisrc.ts", thinned);

    let installer = RecordingInstaller::new();
    let mut svc = service_with(
        &fs,
        &installer,
        ScriptedPrompt::always_no(),
        InstallOptions::default(),
    );
    svc.run().unwrap();

    let calls = installer.calls();
    assert!(calls.contains(&"configure @adonisjs/shield".to_string()));
    assert!(calls.contains(&"configure @adonisjs/mail".to_string()));
    // The add-on's own packages install after the provider checks.
    assert!(calls.last().unwrap().starts_with("install "));
    assert!(calls.last().unwrap().contains("tailwindcss (dev)"));
}

#[test]
fn skip_install_never_touches_the_installer() {
    let fs = seeded_project();
    let installer = RecordingInstaller::new();
    let mut svc = service_with(
        &fs,
        &installer,
        ScriptedPrompt::always_no(),
        InstallOptions { skip_install: true },
    );
    let report = svc.run().unwrap();

    assert!(installer.calls().is_empty());
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("skipped package installation"))
    );
}

// ── self-uninstall ────────────────────────────────────────────────────────────

#[test]
fn accepting_the_prompt_uninstalls_the_addon_package() {
    let fs = seeded_project();
    let installer = RecordingInstaller::new();
    let mut svc = service_with(
        &fs,
        &installer,
        ScriptedPrompt::new([true]),
        InstallOptions::default(),
    );
    svc.run().unwrap();

    assert!(
        installer
            .calls()
            .contains(&"uninstall @graft/jumpstart".to_string())
    );
}

#[test]
fn declining_the_prompt_is_a_normal_termination() {
    let fs = seeded_project();
    let installer = RecordingInstaller::new();
    let mut svc = service_with(
        &fs,
        &installer,
        ScriptedPrompt::always_no(),
        InstallOptions::default(),
    );
    svc.run().unwrap();

    assert!(!installer.calls().iter().any(|c| c.starts_with("uninstall")));
}
