//! Node-level query helpers over tree-sitter TypeScript trees.
//!
//! These are the only functions that know grammar node kinds; the patcher
//! in the parent module works in terms of declarations, members, and
//! offsets returned from here.

use tree_sitter::Node;

/// Text of a node within `source`.
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Named children of a node, collected.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    children
}

/// Named children of a given kind.
pub fn children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    named_children(node)
        .into_iter()
        .filter(|c| c.kind() == kind)
        .collect()
}

/// Strip matching string quotes from a source literal.
pub fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
}

/// Module specifier of an import statement, unquoted.
pub fn import_module<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    let source_node = node.child_by_field_name("source")?;
    Some(unquote(node_text(source_node, source)))
}

/// End byte of the last top-level import, if any.
pub fn last_import_end(root: Node<'_>) -> Option<usize> {
    children_of_kind(root, "import_statement")
        .last()
        .map(Node::end_byte)
}

/// Find a class declaration by name, looking through export statements.
pub fn find_class<'t>(root: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    for child in named_children(root) {
        let candidate = match child.kind() {
            "class_declaration" => Some(child),
            "export_statement" => child
                .child_by_field_name("declaration")
                .filter(|d| d.kind() == "class_declaration"),
            _ => None,
        };
        if let Some(class) = candidate {
            if let Some(n) = class.child_by_field_name("name") {
                if node_text(n, source) == name {
                    return Some(class);
                }
            }
        }
    }
    None
}

/// The `class_body` node of a class declaration.
pub fn class_body(class: Node<'_>) -> Option<Node<'_>> {
    class.child_by_field_name("body")
}

/// Names of the members (methods and properties) declared in a class body.
pub fn class_member_names(body: Node<'_>, source: &str) -> Vec<String> {
    named_children(body)
        .into_iter()
        .filter_map(|m| m.child_by_field_name("name"))
        .map(|n| node_text(n, source).to_string())
        .collect()
}

/// Names declared at the top level of the file (consts, functions,
/// classes), including exported ones.
pub fn top_level_declaration_names(root: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for child in named_children(root) {
        collect_declaration_names(child, source, &mut names);
        if child.kind() == "export_statement" {
            if let Some(decl) = child.child_by_field_name("declaration") {
                collect_declaration_names(decl, source, &mut names);
            }
        }
    }
    names
}

fn collect_declaration_names(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "lexical_declaration" | "variable_declaration" => {
            for declarator in children_of_kind(node, "variable_declarator") {
                if let Some(name) = declarator.child_by_field_name("name") {
                    out.push(node_text(name, source).to_string());
                }
            }
        }
        "function_declaration" | "class_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.push(node_text(name, source).to_string());
            }
        }
        _ => {}
    }
}

/// The expression of `export default <expr>`, with a leading `await`
/// unwrapped (`export default await Env.create(...)`).
pub fn default_export_value<'t>(root: Node<'t>, source: &str) -> Option<Node<'t>> {
    for child in children_of_kind(root, "export_statement") {
        if let Some(value) = child.child_by_field_name("value") {
            return Some(unwrap_await(value));
        }
        // `export default class ...` carries a declaration instead.
        if node_text(child, source).starts_with("export default") {
            if let Some(decl) = child.child_by_field_name("declaration") {
                return Some(decl);
            }
        }
    }
    None
}

fn unwrap_await(node: Node<'_>) -> Node<'_> {
    if node.kind() == "await_expression" {
        node.named_child(0).unwrap_or(node)
    } else {
        node
    }
}

/// Resolve the configuration object from a default-export value.
///
/// Two equivalent syntactic forms exist across framework versions: the
/// object literal exported directly, and an object handed to a factory
/// call (`defineConfig({...})`, `Env.create(url, {...})`). For the call
/// form we take the first object-literal argument.
pub fn resolve_config_object(value: Node<'_>) -> Option<Node<'_>> {
    if value.kind() == "object" {
        return Some(value);
    }
    if value.kind() == "call_expression" {
        let args = value.child_by_field_name("arguments")?;
        return named_children(args).into_iter().find(|a| a.kind() == "object");
    }
    None
}

/// Find the entry for a property name inside an object literal.
pub fn object_property<'t>(object: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    for entry in named_children(object) {
        match entry.kind() {
            "pair" => {
                if let Some(key) = entry.child_by_field_name("key") {
                    if unquote(node_text(key, source)) == name {
                        return Some(entry);
                    }
                }
            }
            "shorthand_property_identifier" => {
                if node_text(entry, source) == name {
                    return Some(entry);
                }
            }
            _ => {}
        }
    }
    None
}

/// The array literal on the value side of a pair, if that is what it is.
pub fn pair_array_value(pair: Node<'_>) -> Option<Node<'_>> {
    pair.child_by_field_name("value").filter(|v| v.kind() == "array")
}
