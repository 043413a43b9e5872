//! Integration tests for the backward data-flow traversal.
//!
//! Each test builds a workspace from inline C# source, selects a symbol by
//! position, and asserts edge-set membership — never emission order.

use std::path::Path;
use varsight_core::{
    CancellationToken, InsightAnalyzer, InsightGraph, InsightNode, Position, Relation,
    SemanticModel, Workspace,
};

fn model_of(source: &str) -> SemanticModel {
    let workspace = Workspace::from_sources(&[("Test.cs", source)]).expect("parse source");
    SemanticModel::build(workspace)
}

fn analyze_at(model: &SemanticModel, source: &str, needle: &str) -> InsightGraph {
    let analyzer = InsightAnalyzer::new(model);
    analyzer
        .analyze(Path::new("Test.cs"), position_of(source, needle))
        .expect("analysis should produce a graph")
}

/// 1-based position of the first occurrence of `needle`.
fn position_of(source: &str, needle: &str) -> Position {
    let offset = source.find(needle).expect("needle not found");
    let line = source[..offset].matches('\n').count() as u32 + 1;
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    Position::new(line, (offset - line_start) as u32 + 1)
}

/// Match a node by qualified id prefix (`Rectangle.GetArea`) or short name.
fn node_matches(node: &InsightNode, pattern: &str) -> bool {
    if pattern.contains('.') {
        node.id().starts_with(&format!("{}@", pattern))
    } else {
        node.name() == pattern
    }
}

fn has_node(graph: &InsightGraph, pattern: &str) -> bool {
    graph.nodes().any(|(_, n)| node_matches(n, pattern))
}

fn has_edge(graph: &InsightGraph, from: &str, to: &str, relation: Relation) -> bool {
    graph.nodes().any(|(id, n)| {
        node_matches(n, from)
            && graph.edges_from(id).into_iter().any(|(target, edge)| {
                edge.relation() == relation
                    && graph.node(target).is_some_and(|t| node_matches(t, to))
            })
    })
}

fn edge_triples(graph: &InsightGraph) -> Vec<(String, String, &'static str)> {
    let mut triples: Vec<_> = graph
        .nodes()
        .flat_map(|(id, n)| {
            graph
                .edges_from(id)
                .into_iter()
                .filter_map(|(target, edge)| {
                    graph.node(target).map(|t| {
                        (
                            n.id().to_string(),
                            t.id().to_string(),
                            edge.relation().label(),
                        )
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();
    triples.sort();
    triples
}

// ── S1: method parameter mapping ───────────────────────────────────────────

const PARAMETER_MAPPING_SOURCE: &str = r#"
class Program {
    static int G;

    static void Main() {
        int a = 2;
        int b = 3;
        int c = 4;
        int d = 5;
        int r = Method(a, b, c) + c + d;
    }

    static int Method(int p1, int p2, int p3) {
        G = p1 * p2 * p3;
        int t1 = p2 * 4;
        int t2 = p2 * 5;
        return t2 * 2;
    }
}
"#;

#[test]
fn test_parameter_maps_to_argument_through_return_chain() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let graph = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");

    assert!(has_edge(&graph, "r", "Method", Relation::Initialization));
    assert!(has_edge(&graph, "r", "c", Relation::Initialization));
    assert!(has_edge(&graph, "r", "d", Relation::Initialization));
    assert!(has_edge(&graph, "Method", "t2", Relation::ReturnContributor));
    assert!(has_edge(&graph, "t2", "p2", Relation::Initialization));
    assert!(has_edge(&graph, "p2", "b", Relation::ParameterMapping));
}

#[test]
fn test_unused_argument_symbol_is_absent() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let graph = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");

    // `a` only ever appears as an argument; it never becomes a node
    assert!(!has_node(&graph, "a"));
}

#[test]
fn test_argument_exclusion_blocks_direct_edges() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let graph = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");

    assert!(!has_edge(&graph, "r", "a", Relation::Initialization));
    assert!(!has_edge(&graph, "r", "b", Relation::Initialization));
    // `b` is reachable, but only through the parameter mapping
    assert!(has_node(&graph, "b"));
}

// ── S2: polymorphic dispatch with the receiver-type guard ──────────────────

const DISPATCH_SOURCE: &str = r#"
class Shape {
    public virtual double GetArea() { return 0; }
}

class Rectangle : Shape {
    public double Width { get; set; }
    public double Height { get; set; }
    public override double GetArea() { return Width * Height; }
}

class Circle : Shape {
    public double Radius { get; set; }
    public override double GetArea() { return 3.14 * Radius * Radius; }
}

class Program {
    static void Main() {
        Shape s = new Rectangle() { Width = 2, Height = 3 };
        double r = s.GetArea();
    }
}
"#;

#[test]
fn test_override_fan_out() {
    let model = model_of(DISPATCH_SOURCE);
    let graph = analyze_at(&model, DISPATCH_SOURCE, "r = s.GetArea");

    assert!(has_edge(&graph, "r", "Shape.GetArea", Relation::Initialization));
    assert!(has_edge(
        &graph,
        "Shape.GetArea",
        "Rectangle.GetArea",
        Relation::Override
    ));
    assert!(has_edge(
        &graph,
        "Shape.GetArea",
        "Circle.GetArea",
        Relation::Override
    ));
}

#[test]
fn test_override_return_contributors_trace_to_receiver() {
    let model = model_of(DISPATCH_SOURCE);
    let graph = analyze_at(&model, DISPATCH_SOURCE, "r = s.GetArea");

    assert!(has_edge(
        &graph,
        "Rectangle.GetArea",
        "Width",
        Relation::ReturnContributor
    ));
    assert!(has_edge(
        &graph,
        "Rectangle.GetArea",
        "Height",
        Relation::ReturnContributor
    ));
    // literal initializer values record the construction site via the receiver
    assert!(has_edge(&graph, "Width", "s", Relation::ObjectInitializer));
    assert!(has_edge(&graph, "Height", "s", Relation::ObjectInitializer));
}

#[test]
fn test_receiver_type_guard_blocks_foreign_members() {
    let model = model_of(DISPATCH_SOURCE);
    let graph = analyze_at(&model, DISPATCH_SOURCE, "r = s.GetArea");

    // `s` is constructed as Rectangle; Circle.Radius must not reach it
    assert!(!has_edge(&graph, "Radius", "s", Relation::ObjectInitializer));
}

#[test]
fn test_overrides_materialize_distinct_nodes() {
    let model = model_of(DISPATCH_SOURCE);
    let graph = analyze_at(&model, DISPATCH_SOURCE, "r = s.GetArea");

    let get_area_nodes = graph
        .nodes()
        .filter(|(_, n)| n.name() == "GetArea")
        .count();
    assert_eq!(get_area_nodes, 3, "base + two overrides, all distinct");
}

// ── S3: instance member through an object-initializer identifier ───────────

const INITIALIZER_SOURCE: &str = r#"
class Person {
    public string Name { get; set; }
    public string GetGreetings() { return $"Greetings {Name}!"; }
    public static string GetStaticGreetings() { return "Hello"; }
    public string GetConsideredAsStatic(int p1) { return $"Age {p1}"; }
}

class Program {
    static void Main() {
        string someName = "Paul";
        var p = new Person() { Name = someName };
        int age = 4;
        string r = p.GetGreetings() + Person.GetStaticGreetings() + p.GetConsideredAsStatic(age);
    }
}
"#;

#[test]
fn test_instance_member_traces_to_initializer_identifier() {
    let model = model_of(INITIALIZER_SOURCE);
    let graph = analyze_at(&model, INITIALIZER_SOURCE, "r = p.GetGreetings");

    assert!(has_edge(&graph, "r", "GetGreetings", Relation::Initialization));
    assert!(has_edge(
        &graph,
        "r",
        "GetStaticGreetings",
        Relation::Initialization
    ));
    assert!(has_edge(
        &graph,
        "r",
        "GetConsideredAsStatic",
        Relation::Initialization
    ));
    assert!(has_edge(
        &graph,
        "GetGreetings",
        "Name",
        Relation::ReturnContributor
    ));
    assert!(has_edge(
        &graph,
        "Name",
        "someName",
        Relation::ObjectInitializer
    ));
}

#[test]
fn test_parameter_of_instance_call_maps_to_argument() {
    let model = model_of(INITIALIZER_SOURCE);
    let graph = analyze_at(&model, INITIALIZER_SOURCE, "r = p.GetGreetings");

    assert!(has_edge(
        &graph,
        "GetConsideredAsStatic",
        "p1",
        Relation::ReturnContributor
    ));
    assert!(has_edge(&graph, "p1", "age", Relation::ParameterMapping));
}

#[test]
fn test_receivers_are_not_direct_contributors() {
    let model = model_of(INITIALIZER_SOURCE);
    let graph = analyze_at(&model, INITIALIZER_SOURCE, "r = p.GetGreetings");

    assert!(!has_edge(&graph, "r", "p", Relation::Initialization));
    assert!(!has_edge(&graph, "r", "age", Relation::Initialization));
}

// ── S5: visited-set termination ────────────────────────────────────────────

#[test]
fn test_self_referencing_assignments_terminate() {
    let source = r#"
class Program {
    static void Main() {
        int x = 1;
        x = x + 1;
        x = x * 2;
    }
}
"#;
    let model = model_of(source);
    let graph = analyze_at(&model, source, "x = 1");

    assert_eq!(graph.node_count(), 1, "x is never its own contributor");
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.total_references(), 0);
}

// ── S6: expression-bodied method ───────────────────────────────────────────

#[test]
fn test_expression_bodied_method() {
    let source = r#"
class Program {
    static int Square(int n) => n * n;

    static void Main() {
        int y = Square(5);
    }
}
"#;
    let model = model_of(source);
    let graph = analyze_at(&model, source, "y = Square");

    assert!(has_edge(&graph, "y", "Square", Relation::Initialization));
    assert!(has_edge(&graph, "Square", "n", Relation::ReturnContributor));

    // the argument is a literal, so the parameter has no mapping
    let (n_id, _) = graph
        .nodes()
        .find(|(_, node)| node.name() == "n")
        .expect("parameter node");
    assert!(graph.edges_from(n_id).is_empty());
}

// ── Invariants ─────────────────────────────────────────────────────────────

#[test]
fn test_analysis_is_idempotent() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let first = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");
    let second = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");

    let mut first_ids: Vec<_> = first.nodes().map(|(_, n)| n.id().to_string()).collect();
    let mut second_ids: Vec<_> = second.nodes().map(|(_, n)| n.id().to_string()).collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);
    assert_eq!(edge_triples(&first), edge_triples(&second));
}

#[test]
fn test_unrelated_code_does_not_change_the_graph() {
    let extended = format!(
        "{}\nclass Unrelated {{ public int Value {{ get; set; }} }}\n",
        PARAMETER_MAPPING_SOURCE
    );
    let base_model = model_of(PARAMETER_MAPPING_SOURCE);
    let extended_model = model_of(&extended);

    let base_graph = analyze_at(&base_model, PARAMETER_MAPPING_SOURCE, "r = Method");
    let extended_graph = analyze_at(&extended_model, &extended, "r = Method");

    assert_eq!(edge_triples(&base_graph), edge_triples(&extended_graph));
}

#[test]
fn test_depth_bound_truncates_long_chains() {
    let source = r#"
class Program {
    static void Main() {
        int v0 = 1;
        int v1 = v0;
        int v2 = v1;
        int v3 = v2;
        int v4 = v3;
        int v5 = v4;
    }
}
"#;
    let workspace = Workspace::from_sources(&[("Test.cs", source)]).unwrap();
    let model = SemanticModel::build(workspace);
    let analyzer = InsightAnalyzer::with_max_depth(&model, 3);
    let graph = analyzer
        .analyze(Path::new("Test.cs"), position_of(source, "v5 = v4"))
        .unwrap();

    // v1 is discovered at the bound; v0 is never reached
    assert!(has_node(&graph, "v1"));
    assert!(!has_node(&graph, "v0"));
}

#[test]
fn test_unanalyzable_selection_returns_none() {
    let source = "class Program { static void Main() { int x = 1; } }";
    let model = model_of(source);
    let analyzer = InsightAnalyzer::new(&model);

    // the `class` keyword does not resolve to a symbol
    let result = analyzer.analyze(Path::new("Test.cs"), position_of(source, "class"));
    assert!(result.is_none());
}

#[test]
fn test_cancelled_analysis_returns_none() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let analyzer = InsightAnalyzer::new(&model);
    let token = CancellationToken::new();
    token.cancel();

    let result = analyzer.analyze_cancellable(
        Path::new("Test.cs"),
        position_of(PARAMETER_MAPPING_SOURCE, "r = Method"),
        &token,
    );
    assert!(result.is_none());
}

#[test]
fn test_total_references_counts_every_node_but_the_root() {
    let model = model_of(PARAMETER_MAPPING_SOURCE);
    let graph = analyze_at(&model, PARAMETER_MAPPING_SOURCE, "r = Method");
    assert_eq!(graph.total_references(), graph.node_count() - 1);
}

#[test]
fn test_compound_assignments_are_write_sites() {
    let source = r#"
class Program {
    static void Main() {
        int seed = 3;
        int total = 0;
        total += seed;
        total++;
    }
}
"#;
    let model = model_of(source);
    let graph = analyze_at(&model, source, "total = 0");

    assert!(has_edge(&graph, "total", "seed", Relation::Assignment));
    // `total++` contributes only `total` itself, which is discarded
    assert!(!has_edge(&graph, "total", "total", Relation::Assignment));
}
