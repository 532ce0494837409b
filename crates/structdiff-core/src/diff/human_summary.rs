//! Human-readable summary renderer for comparison results.

use crate::diff::model::{Difference, DifferenceKind};
use crate::diff::tree::{DifferenceTree, NodeRef};

/// Render a Markdown/text summary of a flat difference list.
///
/// Differences are grouped by kind in a fixed order; within a group they keep
/// the order in which the comparison produced them.
pub fn render_human_summary(differences: &[Difference]) -> String {
    let mut out = String::new();
    out.push_str("## Comparison Result\n\n");

    if differences.is_empty() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    out.push_str(&format!("**Differences**: {}\n\n", differences.len()));

    for kind in KIND_ORDER {
        let group: Vec<&Difference> = differences.iter().filter(|d| d.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("### {} ({})\n\n", kind_label(kind), group.len()));
        for d in group {
            out.push_str(&format!("- {}\n", describe(d)));
        }
        out.push('\n');
    }

    out
}

/// Render a difference tree as an indented outline.
///
/// Element nodes without a member are shown as `[]`. Differences are listed
/// under the node they were recorded on, with their node-local paths.
pub fn render_tree_summary(tree: &DifferenceTree) -> String {
    let mut out = String::new();
    out.push_str("## Difference Tree\n\n");

    if !tree.has_differences() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    render_node(tree.root(), 0, &mut out);
    out
}

fn render_node(node: NodeRef<'_>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let label = match node.member_name() {
        Some(name) => name,
        None if depth == 0 => "<root>",
        None => "[]",
    };
    out.push_str(&format!("{}- **{}**\n", indent, label));
    for d in node.differences() {
        out.push_str(&format!("{}  - {}\n", indent, describe(d)));
    }
    for child in node.descendants() {
        render_node(child, depth + 1, out);
    }
}

const KIND_ORDER: [DifferenceKind; 5] = [
    DifferenceKind::TypeMismatch,
    DifferenceKind::CountMismatch,
    DifferenceKind::ValueMismatch,
    DifferenceKind::MissingInFirst,
    DifferenceKind::MissingInSecond,
];

fn kind_label(kind: DifferenceKind) -> &'static str {
    match kind {
        DifferenceKind::ValueMismatch => "Value Mismatches",
        DifferenceKind::TypeMismatch => "Type Mismatches",
        DifferenceKind::MissingInFirst => "Missing In First",
        DifferenceKind::MissingInSecond => "Missing In Second",
        DifferenceKind::CountMismatch => "Count Mismatches",
    }
}

fn describe(d: &Difference) -> String {
    let path = if d.path.is_empty() { "<root>" } else { d.path.as_str() };
    let mut line = match d.kind {
        DifferenceKind::MissingInFirst => format!("`{}`: only in second: `{}`", path, d.value2),
        DifferenceKind::MissingInSecond => format!("`{}`: only in first: `{}`", path, d.value1),
        _ => format!("`{}`: `{}` → `{}`", path, d.value1, d.value2),
    };
    if let Some(note) = &d.note {
        line.push_str(&format!(" ({})", note));
    }
    line
}
