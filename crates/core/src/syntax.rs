//! Small tree-sitter helpers shared by the semantic model and the analysis
//! passes.
//!
//! The C# grammar leaves several constructs without named fields
//! (`variable_declaration` under a field declaration, `base_list`,
//! `argument_list`, the initializer after `=` in a declarator), so helpers
//! here locate them by kind or by token position.

use tree_sitter::Node;

/// Get a node's source text, or `""` when the span is not valid UTF-8.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Text of a named field, as an owned string.
pub fn field_text(node: &Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)?
        .utf8_text(source.as_bytes())
        .ok()
        .map(|s| s.to_string())
}

/// Find the first child node with the given kind.
pub fn find_child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).find(|c| c.kind() == kind);
    result
}

/// Check whether a declaration carries the given modifier (`static`,
/// `virtual`, `abstract`, `override`, `const`, ...).
pub fn has_modifier(node: &Node, source: &str, modifier: &str) -> bool {
    let mut cursor = node.walk();
    let result = node
        .children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .any(|c| node_text(&c, source) == modifier);
    result
}

/// The initializer expression of a `variable_declarator` or a
/// `property_declaration` with an `= value` clause.
///
/// The grammar does not name the value; it is the child following the `=`
/// token.
pub fn initializer_value<'a>(declarator: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = declarator.walk();
    let mut saw_equals = false;
    for child in declarator.children(&mut cursor) {
        if saw_equals && child.is_named() {
            return Some(child);
        }
        if child.kind() == "=" {
            saw_equals = true;
        }
    }
    None
}

/// Preorder traversal of a subtree, including `node` itself.
pub fn preorder<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    preorder_pruned(node, &[])
}

/// Preorder traversal that skips subtrees rooted at any of the `prune`
/// kinds (the pruned node itself is not yielded). The root is exempt so a
/// method declaration can be walked with its own kind in the prune list.
pub fn preorder_pruned<'a>(node: Node<'a>, prune: &[&str]) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    walk(node, prune, true, &mut out);
    out
}

fn walk<'a>(node: Node<'a>, prune: &[&str], is_root: bool, out: &mut Vec<Node<'a>>) {
    if !is_root && prune.contains(&node.kind()) {
        return;
    }
    out.push(node);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk(child, prune, false, out);
    }
}

/// Kinds that open a nested callable body; locals and returns inside them
/// belong to the nested callable, not the enclosing one.
pub const NESTED_CALLABLE_KINDS: &[&str] = &[
    "local_function_statement",
    "lambda_expression",
    "anonymous_method_expression",
];

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .expect("load C# grammar");
        parser.parse(source, None).expect("parse")
    }

    #[test]
    fn test_initializer_value_of_declarator() {
        let source = "class C { void M() { int x = 1 + 2; } }";
        let tree = parse(source);
        let declarator = preorder(tree.root_node())
            .into_iter()
            .find(|n| n.kind() == "variable_declarator")
            .unwrap();
        let value = initializer_value(&declarator).unwrap();
        assert_eq!(node_text(&value, source), "1 + 2");
    }

    #[test]
    fn test_declarator_without_initializer() {
        let source = "class C { void M() { int x; } }";
        let tree = parse(source);
        let declarator = preorder(tree.root_node())
            .into_iter()
            .find(|n| n.kind() == "variable_declarator")
            .unwrap();
        assert!(initializer_value(&declarator).is_none());
    }

    #[test]
    fn test_has_modifier() {
        let source = "class C { static virtual int M() { return 0; } }";
        let tree = parse(source);
        let method = preorder(tree.root_node())
            .into_iter()
            .find(|n| n.kind() == "method_declaration")
            .unwrap();
        assert!(has_modifier(&method, source, "static"));
        assert!(has_modifier(&method, source, "virtual"));
        assert!(!has_modifier(&method, source, "override"));
    }

    #[test]
    fn test_preorder_pruned_skips_local_functions() {
        let source = "class C { int M() { int a = 1; int L() { return 9; } return a; } }";
        let tree = parse(source);
        let method = preorder(tree.root_node())
            .into_iter()
            .find(|n| n.kind() == "method_declaration")
            .unwrap();
        let returns: Vec<_> = preorder_pruned(method, NESTED_CALLABLE_KINDS)
            .into_iter()
            .filter(|n| n.kind() == "return_statement")
            .collect();
        assert_eq!(returns.len(), 1, "local function return must be skipped");
        assert_eq!(node_text(&returns[0], source), "return a;");
    }
}
