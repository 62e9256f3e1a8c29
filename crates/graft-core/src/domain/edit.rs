//! Idempotent text edits.
//!
//! An [`Edit`] is a pure function from current content to
//! `(new content, changed)`. Edits are applied **sequentially**: each edit
//! observes the previous edit's output, so a replace that targets text
//! produced by an earlier insert works as expected. This is sequential
//! composition, not a set of independent patches.
//!
//! Matching is always literal. Stub content routinely contains characters
//! that are meaningful to pattern languages (`$`, `{`, `*`); treating markers
//! as patterns would invite accidental expansion.

use crate::domain::error::DomainError;

/// Where an [`Edit::InsertLineIfMissing`] places its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Insert before the current content.
    Prepend,
    /// Insert after the current content.
    Append,
}

/// A single idempotent string-level edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Insert `line` at `position` unless `marker` already occurs verbatim
    /// in the content. The marker is the idempotence key; it need not equal
    /// the inserted line.
    InsertLineIfMissing {
        marker: String,
        line: String,
        position: Position,
    },
    /// Replace the first literal occurrence of `needle` with `replacement`.
    /// No-op when the needle is absent, which is also what makes the edit
    /// idempotent once the replacement no longer contains the needle.
    ReplaceOnce { needle: String, replacement: String },
}

impl Edit {
    /// Build an insert-if-missing edit. The marker must be non-empty:
    /// an empty marker is contained in every string and the edit would
    /// never fire.
    pub fn insert_if_missing(
        marker: impl Into<String>,
        line: impl Into<String>,
        position: Position,
    ) -> Result<Self, DomainError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(DomainError::EmptyMarker);
        }
        Ok(Self::InsertLineIfMissing {
            marker,
            line: line.into(),
            position,
        })
    }

    /// Build a replace-once edit. An empty needle would match at offset 0
    /// of any content and is rejected.
    pub fn replace_once(
        needle: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(DomainError::EmptyNeedle);
        }
        Ok(Self::ReplaceOnce {
            needle,
            replacement: replacement.into(),
        })
    }

    /// Apply this edit to `content`, returning the new content and whether
    /// anything changed.
    pub fn apply(&self, content: &str) -> (String, bool) {
        match self {
            Self::InsertLineIfMissing {
                marker,
                line,
                position,
            } => {
                if content.contains(marker.as_str()) {
                    return (content.to_string(), false);
                }
                (insert_block(content, line, *position), true)
            }
            Self::ReplaceOnce {
                needle,
                replacement,
            } => {
                if !content.contains(needle.as_str()) {
                    return (content.to_string(), false);
                }
                (content.replacen(needle.as_str(), replacement, 1), true)
            }
        }
    }
}

/// Apply `edits` in list order against the latest intermediate content.
///
/// Returns the final content and whether *any* edit changed something.
pub fn apply_edits(content: &str, edits: &[Edit]) -> (String, bool) {
    let mut current = content.to_string();
    let mut changed = false;

    for edit in edits {
        let (next, did_change) = edit.apply(&current);
        current = next;
        changed |= did_change;
    }

    (current, changed)
}

/// Splice `line` into `content` at `position`.
///
/// The inserted block always ends with exactly one newline; content keeps a
/// single separating newline so repeated installs never accumulate blank
/// lines.
fn insert_block(content: &str, line: &str, position: Position) -> String {
    let mut block = line.to_string();
    if !block.ends_with('\n') {
        block.push('\n');
    }

    if content.is_empty() {
        return block;
    }

    match position {
        Position::Prepend => format!("{block}{content}"),
        Position::Append => {
            if content.ends_with('\n') {
                format!("{content}{block}")
            } else {
                format!("{content}\n{block}")
            }
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(marker: &str, line: &str, position: Position) -> Edit {
        Edit::insert_if_missing(marker, line, position).unwrap()
    }

    fn replace(needle: &str, replacement: &str) -> Edit {
        Edit::replace_once(needle, replacement).unwrap()
    }

    // ── constructors ──────────────────────────────────────────────────────

    #[test]
    fn empty_marker_is_rejected() {
        assert_eq!(
            Edit::insert_if_missing("", "line", Position::Append),
            Err(DomainError::EmptyMarker)
        );
    }

    #[test]
    fn empty_needle_is_rejected() {
        assert_eq!(Edit::replace_once("", "x"), Err(DomainError::EmptyNeedle));
    }

    // ── insert-if-missing ─────────────────────────────────────────────────

    #[test]
    fn insert_into_empty_content() {
        let (out, changed) = insert("KEY=", "KEY=value", Position::Append).apply("");
        assert!(changed);
        assert_eq!(out, "KEY=value\n");
    }

    #[test]
    fn insert_is_noop_when_marker_present() {
        let content = "KEY=already-set\n";
        let (out, changed) = insert("KEY=", "KEY=value", Position::Append).apply(content);
        assert!(!changed);
        assert_eq!(out, content);
    }

    #[test]
    fn prepend_places_line_first() {
        let (out, changed) = insert("[x-cloak]", "[x-cloak] { display: none; }", Position::Prepend)
            .apply("body { margin: 0; }\n");
        assert!(changed);
        assert_eq!(out, "[x-cloak] { display: none; }\nbody { margin: 0; }\n");
    }

    #[test]
    fn append_separates_with_single_newline() {
        let (out, _) = insert("B=", "B=2", Position::Append).apply("A=1");
        assert_eq!(out, "A=1\nB=2\n");

        let (out, _) = insert("B=", "B=2", Position::Append).apply("A=1\n");
        assert_eq!(out, "A=1\nB=2\n");
    }

    #[test]
    fn multi_line_block_keeps_single_trailing_newline() {
        let block = "@import \"tailwindcss\";\n@source \"../views\";\n";
        let (out, changed) = insert("@import \"tailwindcss\"", block, Position::Prepend).apply("");
        assert!(changed);
        assert_eq!(out, block);
        assert!(!out.ends_with("\n\n"));
    }

    // ── replace-once ──────────────────────────────────────────────────────

    #[test]
    fn replace_changes_first_occurrence_only() {
        let (out, changed) = replace("false", "true").apply("a: false, b: false");
        assert!(changed);
        assert_eq!(out, "a: true, b: false");
    }

    #[test]
    fn replace_is_noop_when_needle_absent() {
        let content = "allowMethodSpoofing: true";
        let (out, changed) = replace("allowMethodSpoofing: false", "allowMethodSpoofing: true")
            .apply(content);
        assert!(!changed);
        assert_eq!(out, content);
    }

    #[test]
    fn replace_matching_is_literal_not_pattern() {
        // A regex engine would treat `.*` and `$` specially; we must not.
        let (out, changed) = replace(".*", "DOT-STAR").apply("price is $5 and .* is literal");
        assert!(changed);
        assert_eq!(out, "price is $5 and DOT-STAR is literal");
    }

    #[test]
    fn replace_with_empty_removes_block() {
        let reset = "* {\n  margin: 0;\n  padding: 0;\n}";
        let content = format!("{reset}\n.app {{ color: red; }}\n");
        let (out, changed) = replace(reset, "").apply(&content);
        assert!(changed);
        assert!(!out.contains("margin: 0"));
        assert!(out.contains(".app { color: red; }"));
    }

    // ── sequential composition ────────────────────────────────────────────

    #[test]
    fn later_edit_observes_earlier_edits_output() {
        // B's needle only exists after A has run.
        let a = insert("STAGE_ONE", "STAGE_ONE=pending", Position::Append);
        let b = replace("STAGE_ONE=pending", "STAGE_ONE=done");

        let (out, changed) = apply_edits("", &[a, b]);
        assert!(changed);
        assert_eq!(out, "STAGE_ONE=done\n");
    }

    #[test]
    fn edit_order_is_observable() {
        // Reversed, the replace runs before its needle exists and the
        // insert's line survives untouched - documented order sensitivity.
        let a = insert("STAGE_ONE", "STAGE_ONE=pending", Position::Append);
        let b = replace("STAGE_ONE=pending", "STAGE_ONE=done");

        let (out, _) = apply_edits("", &[b, a]);
        assert_eq!(out, "STAGE_ONE=pending\n");
    }

    #[test]
    fn apply_edits_reports_unchanged_when_all_noop() {
        let content = "KEY=value\n";
        let edits = [
            insert("KEY=", "KEY=value", Position::Append),
            replace("absent-needle", "x"),
        ];
        let (out, changed) = apply_edits(content, &edits);
        assert!(!changed);
        assert_eq!(out, content);
    }

    #[test]
    fn second_application_is_identity() {
        let edits = [
            insert("[x-cloak]", "[x-cloak] { display: none; }", Position::Prepend),
            insert("@import \"tailwindcss\"", "@import \"tailwindcss\";", Position::Prepend),
        ];

        let (once, changed_first) = apply_edits("", &edits);
        assert!(changed_first);

        let (twice, changed_second) = apply_edits(&once, &edits);
        assert!(!changed_second);
        assert_eq!(once, twice);
    }
}
