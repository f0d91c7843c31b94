//! Translation of the `graph` shorthand into Mermaid flowchart syntax.
//!
//! The shorthand is line oriented and every line stands alone:
//!
//! | line          | meaning          | Mermaid            |
//! |---------------|------------------|--------------------|
//! | `A -> B`      | directed edge    | `A --> B`          |
//! | `A -- B`      | undirected edge  | `A --- B`          |
//! | `id = Label`  | node label       | `id["Label"]`      |
//! | anything else | passed through   | unchanged          |
//!
//! Operators are checked in that order and only the first occurrence
//! splits the line, so `A->B=C` is an edge from `A` to `B=C`.

use std::fmt;

/// Flowchart header emitted before the translated statements.
pub const GRAPH_HEADER: &str = "graph LR";

const INDENT: &str = "    ";

/// One translated line of the `graph` shorthand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphStatement {
    /// `from -> to`
    DirectedEdge { from: String, to: String },
    /// `a -- b`
    UndirectedEdge { a: String, b: String },
    /// `id = label`
    Node { id: String, label: String },
    /// A line with no recognized operator, kept verbatim.
    Raw(String),
}

impl GraphStatement {
    /// Parse a single shorthand line.
    ///
    /// Returns `None` for blank lines and for operator lines with an empty
    /// operand (`-> B`, `A --`, `= Label`).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some((from, to)) = split_operands(line, "->") {
            return Some(Self::DirectedEdge { from, to });
        }
        if line.contains("->") {
            return None;
        }

        if let Some((a, b)) = split_operands(line, "--") {
            return Some(Self::UndirectedEdge { a, b });
        }
        if line.contains("--") {
            return None;
        }

        if let Some((id, label)) = split_operands(line, "=") {
            return Some(Self::Node { id, label });
        }
        if line.contains('=') {
            return None;
        }

        Some(Self::Raw(line.to_owned()))
    }
}

impl fmt::Display for GraphStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectedEdge { from, to } => write!(f, "{from} --> {to}"),
            Self::UndirectedEdge { a, b } => write!(f, "{a} --- {b}"),
            Self::Node { id, label } => write!(f, "{id}[\"{}\"]", escape_label(label)),
            Self::Raw(line) => f.write_str(line),
        }
    }
}

/// Split on the first occurrence of `op` into two non-empty trimmed operands.
fn split_operands(line: &str, op: &str) -> Option<(String, String)> {
    let (left, right) = line.split_once(op)?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left.to_owned(), right.to_owned()))
}

/// Mermaid has no backslash escapes inside quoted labels; it uses entities.
fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Parse every line of a `graph` block, skipping blank and dropped lines.
pub fn parse(source: &str) -> impl Iterator<Item = GraphStatement> + '_ {
    source.lines().filter_map(GraphStatement::parse)
}

/// Translate a `graph` block into Mermaid flowchart source.
///
/// # Example
///
/// ```
/// use pitch_diagrams::translate_graph;
///
/// let mermaid = translate_graph("Client -> API\nAPI = Proposal service");
/// assert_eq!(
///     mermaid,
///     "graph LR\n    Client --> API\n    API[\"Proposal service\"]\n"
/// );
/// ```
#[must_use]
pub fn translate(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + GRAPH_HEADER.len() + 1);
    out.push_str(GRAPH_HEADER);
    out.push('\n');
    for statement in parse(source.trim()) {
        out.push_str(INDENT);
        out.push_str(&statement.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edge(from: &str, to: &str) -> GraphStatement {
        GraphStatement::DirectedEdge {
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }

    #[test]
    fn test_directed_edge() {
        assert_eq!(GraphStatement::parse("A -> B"), Some(edge("A", "B")));
    }

    #[test]
    fn test_undirected_edge() {
        assert_eq!(
            GraphStatement::parse("  Sales -- Support  "),
            Some(GraphStatement::UndirectedEdge {
                a: "Sales".to_owned(),
                b: "Support".to_owned(),
            })
        );
    }

    #[test]
    fn test_node_label() {
        assert_eq!(
            GraphStatement::parse("db = Postgres 16"),
            Some(GraphStatement::Node {
                id: "db".to_owned(),
                label: "Postgres 16".to_owned(),
            })
        );
    }

    #[test]
    fn test_blank_line_yields_nothing() {
        assert_eq!(GraphStatement::parse(""), None);
        assert_eq!(GraphStatement::parse("   \t"), None);
    }

    #[test]
    fn test_directed_takes_precedence_over_assignment() {
        assert_eq!(GraphStatement::parse("A->B=C"), Some(edge("A", "B=C")));
    }

    #[test]
    fn test_directed_takes_precedence_over_undirected() {
        assert_eq!(GraphStatement::parse("A -- B -> C"), Some(edge("A -- B", "C")));
    }

    #[test]
    fn test_splits_on_first_occurrence() {
        assert_eq!(GraphStatement::parse("A -> B -> C"), Some(edge("A", "B -> C")));
    }

    #[test]
    fn test_empty_operands_drop_line() {
        assert_eq!(GraphStatement::parse("-> B"), None);
        assert_eq!(GraphStatement::parse("A ->"), None);
        assert_eq!(GraphStatement::parse("A --"), None);
        assert_eq!(GraphStatement::parse("= Label"), None);
        assert_eq!(GraphStatement::parse("id ="), None);
    }

    #[test]
    fn test_raw_passthrough() {
        assert_eq!(
            GraphStatement::parse("  classDef hot fill:#f96  "),
            Some(GraphStatement::Raw("classDef hot fill:#f96".to_owned()))
        );
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(edge("A", "B").to_string(), "A --> B");
        assert_eq!(
            GraphStatement::Node {
                id: "q".to_owned(),
                label: r#"say "hi""#.to_owned(),
            }
            .to_string(),
            r#"q["say #quot;hi#quot;"]"#
        );
    }

    #[test]
    fn test_translate_block() {
        let dsl = "\n  Discovery -> Design\nDesign -- Build\n\nBuild = Build & test\nstyle Build fill:#eee\n";
        assert_eq!(
            translate(dsl),
            concat!(
                "graph LR\n",
                "    Discovery --> Design\n",
                "    Design --- Build\n",
                "    Build[\"Build & test\"]\n",
                "    style Build fill:#eee\n",
            )
        );
    }

    #[test]
    fn test_translate_empty_block() {
        assert_eq!(translate("  \n\n"), "graph LR\n");
    }
}
