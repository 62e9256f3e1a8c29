//! Inputs to the structured source patcher.
//!
//! Each spec carries the *name* that acts as its idempotence key (the
//! declaration identifier, or the module specifier for imports) plus enough
//! detail to render the inserted text. Rendering lives here so formatting is
//! fixed in one place; the patcher only splices.

use serde::Serialize;

use crate::domain::error::DomainError;

/// An `import` declaration keyed by its exact module specifier.
///
/// A file that already imports the module is never touched, even when the
/// existing import carries different bindings. Merging at the binding level
/// is an explicit non-feature: the specifier is the whole idempotence key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    pub default_import: Option<String>,
    pub named_imports: Vec<String>,
    pub module: String,
}

impl ImportSpec {
    pub fn named(
        module: impl Into<String>,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DomainError> {
        let spec = Self {
            default_import: None,
            named_imports: names.into_iter().map(Into::into).collect(),
            module: module.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn default(
        binding: impl Into<String>,
        module: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let spec = Self {
            default_import: Some(binding.into()),
            named_imports: Vec::new(),
            module: module.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.module.is_empty() {
            return Err(DomainError::InvalidModuleSpecifier(self.module.clone()));
        }
        if self.default_import.is_none() && self.named_imports.is_empty() {
            return Err(DomainError::EmptyImport {
                module: self.module.clone(),
            });
        }
        Ok(())
    }

    /// Render the full import statement, no trailing newline.
    pub fn render(&self) -> String {
        let mut bindings = String::new();
        if let Some(default) = &self.default_import {
            bindings.push_str(default);
        }
        if !self.named_imports.is_empty() {
            if !bindings.is_empty() {
                bindings.push_str(", ");
            }
            bindings.push_str("{ ");
            bindings.push_str(&self.named_imports.join(", "));
            bindings.push_str(" }");
        }
        format!("import {} from '{}'", bindings, self.module)
    }
}

/// A top-level `const` declaration keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstDecl {
    pub name: String,
    pub initializer: String,
}

impl ConstDecl {
    pub fn new(name: impl Into<String>, initializer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initializer: initializer.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("const {} = {}", self.name, self.initializer)
    }
}

/// A class property keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    pub name: String,
    pub is_static: bool,
    pub initializer: String,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, initializer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            initializer: initializer.into(),
        }
    }

    pub fn staticized(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Render the member with the given indentation (two spaces per level).
    pub fn render(&self, indent: &str) -> String {
        let modifier = if self.is_static { "static " } else { "" };
        format!("{indent}{modifier}{} = {}", self.name, self.initializer)
    }
}

/// One method parameter. The name side may be a destructuring pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A class method keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    pub name: String,
    pub is_static: bool,
    pub is_async: bool,
    pub params: Vec<Param>,
    /// Body statements, one per line, without braces or indentation.
    pub body: Vec<String>,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_async: false,
            params: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn staticized(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn asynced(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn body_lines(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.body = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Render the method with fixed two-space indentation relative to
    /// `indent` (the class-body indentation).
    pub fn render(&self, indent: &str) -> String {
        let mut header = String::new();
        header.push_str(indent);
        if self.is_static {
            header.push_str("static ");
        }
        if self.is_async {
            header.push_str("async ");
        }
        header.push_str(&self.name);

        let params = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = format!("{header}({params}) {{\n");
        for line in &self.body {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(indent);
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(indent);
        out.push('}');
        out
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_import_renders() {
        let spec = ImportSpec::named("#start/kernel", ["middleware"]).unwrap();
        assert_eq!(spec.render(), "import { middleware } from '#start/kernel'");
    }

    #[test]
    fn default_import_renders() {
        let spec = ImportSpec::default("db", "@adonisjs/lucid/services/db").unwrap();
        assert_eq!(spec.render(), "import db from '@adonisjs/lucid/services/db'");
    }

    #[test]
    fn mixed_import_renders_default_first() {
        let spec = ImportSpec {
            default_import: Some("app".into()),
            named_imports: vec!["config".into()],
            module: "@adonisjs/core/services/app".into(),
        };
        assert_eq!(
            spec.render(),
            "import app, { config } from '@adonisjs/core/services/app'"
        );
    }

    #[test]
    fn import_without_bindings_is_rejected() {
        let spec = ImportSpec::named("#start/kernel", Vec::<String>::new());
        assert!(matches!(spec, Err(DomainError::EmptyImport { .. })));
    }

    #[test]
    fn const_decl_renders() {
        let decl = ConstDecl::new(
            "LoginController",
            "() => import('#controllers/auth/login_controller')",
        );
        assert_eq!(
            decl.render(),
            "const LoginController = () => import('#controllers/auth/login_controller')"
        );
    }

    #[test]
    fn static_property_renders_with_indent() {
        let prop = PropertySpec::new(
            "rememberMeTokens",
            "DbRememberMeTokensProvider.forModel(User)",
        )
        .staticized();
        assert_eq!(
            prop.render("  "),
            "  static rememberMeTokens = DbRememberMeTokensProvider.forModel(User)"
        );
    }

    #[test]
    fn method_renders_with_fixed_indentation() {
        let method = MethodSpec::new("logout")
            .staticized()
            .asynced()
            .param("auth", "Authenticator<Authenticators>")
            .body_lines(["await auth.use('web').logout()"]);

        assert_eq!(
            method.render("  "),
            "  static async logout(auth: Authenticator<Authenticators>) {\n    await auth.use('web').logout()\n  }"
        );
    }
}
