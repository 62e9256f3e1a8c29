//! Structured source patcher backed by tree-sitter.
//!
//! Mutations are performed by splicing rendered text into the original
//! source at byte offsets computed from the tree, then re-parsing on the
//! next operation. Files are small and operations few, so a fresh parse
//! per operation is cheaper than maintaining an incremental tree - and it
//! guarantees every probe sees the latest text.
//!
//! Formatting of inserted members is fixed (two-space indentation); the
//! surrounding user code is never reflowed.

mod query;

use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::{Language, Parser, Tree};

use graft_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, SourceHandle, SourcePatcher},
    },
    domain::{ConstDecl, ImportSpec, MethodSpec, PropertySpec},
    error::{GraftError, GraftResult},
};

use query::{
    children_of_kind, class_body, class_member_names, default_export_value, find_class,
    import_module, last_import_end, named_children, object_property, pair_array_value,
    resolve_config_object, top_level_declaration_names,
};

/// TypeScript implementation of the [`SourcePatcher`] port.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsPatcher;

impl TsPatcher {
    pub fn new() -> Self {
        Self
    }
}

impl SourcePatcher for TsPatcher {
    fn open(&self, fs: &dyn Filesystem, path: &Path) -> GraftResult<Box<dyn SourceHandle>> {
        let text = fs
            .read_file(path)?
            .ok_or_else(|| ApplicationError::SourceNotFound {
                path: path.to_path_buf(),
            })?;

        let source = TsSource {
            path: path.to_path_buf(),
            text,
            changed: false,
        };
        // Fail fast on unparseable input instead of erroring mid-patch.
        source.tree()?;
        Ok(Box::new(source))
    }
}

/// One parsed TypeScript file, edited by byte-offset splicing.
struct TsSource {
    path: PathBuf,
    text: String,
    changed: bool,
}

impl TsSource {
    fn tree(&self) -> GraftResult<Tree> {
        let mut parser = Parser::new();
        let language = Language::new(tree_sitter_typescript::LANGUAGE_TYPESCRIPT);
        parser
            .set_language(&language)
            .map_err(|e| ApplicationError::ParseFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        parser
            .parse(&self.text, None)
            .ok_or_else(|| {
                ApplicationError::ParseFailed {
                    path: self.path.clone(),
                    reason: "parser produced no tree".into(),
                }
                .into()
            })
    }

    fn splice(&mut self, at: usize, insertion: &str) {
        debug!(path = %self.path.display(), at, "splicing insertion");
        self.text.insert_str(at, insertion);
        self.changed = true;
    }

    fn export_not_found(&self) -> GraftError {
        ApplicationError::ExportNotFound {
            path: self.path.clone(),
        }
        .into()
    }

    fn container_not_found(&self, container: impl Into<String>) -> GraftError {
        ApplicationError::ContainerNotFound {
            path: self.path.clone(),
            container: container.into(),
        }
        .into()
    }

    /// `(class body start, class body end)` byte offsets for a class, or
    /// `ContainerNotFound`.
    fn class_body_span(&self, class: &str) -> GraftResult<(usize, usize)> {
        let tree = self.tree()?;
        let root = tree.root_node();
        let node = find_class(root, &self.text, class)
            .and_then(class_body)
            .ok_or_else(|| self.container_not_found(format!("class {class}")))?;
        Ok((node.start_byte(), node.end_byte()))
    }

    /// Resolve the default-export configuration object, distinguishing a
    /// missing export from a missing object.
    fn config_object_of<'t>(&self, tree: &'t Tree) -> GraftResult<tree_sitter::Node<'t>> {
        let root = tree.root_node();
        let value =
            default_export_value(root, &self.text).ok_or_else(|| self.export_not_found())?;
        resolve_config_object(value)
            .ok_or_else(|| self.container_not_found("configuration object"))
    }
}

impl SourceHandle for TsSource {
    fn text(&self) -> &str {
        &self.text
    }

    fn changed(&self) -> bool {
        self.changed
    }

    // ── imports ───────────────────────────────────────────────────────────

    fn has_import(&self, module: &str) -> bool {
        let Ok(tree) = self.tree() else { return false };
        children_of_kind(tree.root_node(), "import_statement")
            .into_iter()
            .any(|node| import_module(node, &self.text) == Some(module))
    }

    fn add_import(&mut self, import: &ImportSpec) -> bool {
        if self.has_import(&import.module) {
            return false;
        }

        let insertion_point = self.tree().ok().and_then(|t| last_import_end(t.root_node()));
        let statement = import.render();
        match insertion_point {
            Some(end) => self.splice(end, &format!("\n{statement}")),
            None => self.splice(0, &format!("{statement}\n")),
        }
        true
    }

    // ── classes ───────────────────────────────────────────────────────────

    fn has_class(&self, class: &str) -> bool {
        let Ok(tree) = self.tree() else { return false };
        find_class(tree.root_node(), &self.text, class).is_some()
    }

    fn has_class_member(&self, class: &str, member: &str) -> GraftResult<bool> {
        let tree = self.tree()?;
        let root = tree.root_node();
        let body = find_class(root, &self.text, class)
            .and_then(class_body)
            .ok_or_else(|| self.container_not_found(format!("class {class}")))?;
        Ok(class_member_names(body, &self.text)
            .iter()
            .any(|name| name == member))
    }

    fn add_class_property(&mut self, class: &str, property: &PropertySpec) -> GraftResult<bool> {
        if self.has_class_member(class, &property.name)? {
            return Ok(false);
        }
        let (body_start, _) = self.class_body_span(class)?;
        let insertion = format!("\n{}", property.render("  "));
        self.splice(body_start + 1, &insertion);
        Ok(true)
    }

    fn add_class_method(&mut self, class: &str, method: &MethodSpec) -> GraftResult<bool> {
        if self.has_class_member(class, &method.name)? {
            return Ok(false);
        }
        let (_, body_end) = self.class_body_span(class)?;
        let insertion = format!("\n{}\n", method.render("  "));
        // body_end is exclusive; the closing brace sits one byte before it.
        self.splice(body_end - 1, &insertion);
        Ok(true)
    }

    // ── top-level declarations ────────────────────────────────────────────

    fn add_consts_after_imports(&mut self, decls: &[ConstDecl]) -> GraftResult<usize> {
        let (existing, insertion_point) = {
            let tree = self.tree()?;
            let root = tree.root_node();
            (
                top_level_declaration_names(root, &self.text),
                last_import_end(root),
            )
        };

        let missing: Vec<&ConstDecl> = decls
            .iter()
            .filter(|d| !existing.iter().any(|name| name == &d.name))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let block = missing
            .iter()
            .map(|d| d.render())
            .collect::<Vec<_>>()
            .join("\n");
        match insertion_point {
            Some(end) => self.splice(end, &format!("\n{block}")),
            None => self.splice(0, &format!("{block}\n")),
        }
        Ok(missing.len())
    }

    fn append_statements_if_absent(&mut self, marker: &str, statements: &[&str]) -> usize {
        if self.text.contains(marker) {
            return 0;
        }

        // Empty entries are blank separator lines; real statements are
        // individually containment-checked so a partially applied earlier
        // run only receives the missing subset.
        let missing: Vec<&str> = statements
            .iter()
            .copied()
            .filter(|s| s.is_empty() || !self.text.contains(*s))
            .collect();
        let appended = missing.iter().filter(|s| !s.is_empty()).count();
        if appended == 0 {
            return 0;
        }

        let mut block = String::new();
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
        for statement in &missing {
            block.push_str(statement);
            block.push('\n');
        }

        let at = self.text.len();
        self.splice(at, &block);
        appended
    }

    // ── configuration object ──────────────────────────────────────────────

    fn config_array_contains(&self, property: &str, needle: &str) -> GraftResult<bool> {
        let tree = self.tree()?;
        let object = self.config_object_of(&tree)?;

        let Some(pair) = object_property(object, &self.text, property) else {
            return Ok(false);
        };
        let Some(array) = pair_array_value(pair) else {
            return Ok(false);
        };
        Ok(query::node_text(array, &self.text).contains(needle))
    }

    fn append_config_array_entry(
        &mut self,
        property: &str,
        entry: &str,
        needle: &str,
    ) -> GraftResult<bool> {
        if self.config_array_contains(property, needle)? {
            return Ok(false);
        }

        enum Site {
            AfterElement(usize),
            EmptyArray(usize),
            AfterEntry(usize),
            EmptyObject(usize),
        }

        let site = {
            let tree = self.tree()?;
            let object = self.config_object_of(&tree)?;
            match object_property(object, &self.text, property) {
                Some(pair) => {
                    let array = pair_array_value(pair).ok_or_else(|| {
                        self.container_not_found(format!("{property} array"))
                    })?;
                    match named_children(array).last() {
                        Some(last) => Site::AfterElement(last.end_byte()),
                        None => Site::EmptyArray(array.start_byte() + 1),
                    }
                }
                None => match named_children(object).last() {
                    Some(last) => Site::AfterEntry(last.end_byte()),
                    None => Site::EmptyObject(object.start_byte() + 1),
                },
            }
        };

        match site {
            Site::AfterElement(at) => self.splice(at, &format!(",\n    {entry}")),
            Site::EmptyArray(at) => self.splice(at, entry),
            Site::AfterEntry(at) => self.splice(at, &format!(",\n  {property}: [{entry}]")),
            Site::EmptyObject(at) => {
                self.splice(at, &format!("\n  {property}: [{entry}],\n"));
            }
        }
        Ok(true)
    }

    fn add_config_object_property(&mut self, name: &str, initializer: &str) -> GraftResult<bool> {
        enum Site {
            AfterEntry(usize),
            EmptyObject(usize),
        }

        let site = {
            let tree = self.tree()?;
            let object = self.config_object_of(&tree)?;
            if object_property(object, &self.text, name).is_some() {
                None
            } else {
                Some(match named_children(object).last() {
                    Some(last) => Site::AfterEntry(last.end_byte()),
                    None => Site::EmptyObject(object.start_byte() + 1),
                })
            }
        };

        let Some(site) = site else { return Ok(false) };
        match site {
            Site::AfterEntry(at) => self.splice(at, &format!(",\n  {name}: {initializer}")),
            Site::EmptyObject(at) => self.splice(at, &format!("\n  {name}: {initializer},\n")),
        }
        Ok(true)
    }
}
