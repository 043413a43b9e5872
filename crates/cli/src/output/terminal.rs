//! Terminal output: the insight graph as a colored tree.

use colored::{ColoredString, Colorize};
use std::collections::HashSet;
use varsight_core::{InsightGraph, NodeId, Relation};

pub fn print_graph(graph: &InsightGraph) {
    if let Some(root) = graph.node(graph.root()) {
        println!(
            "{} {} {} — {}",
            root.name().bold(),
            format!("({})", root.kind()).dimmed(),
            root.type_string().cyan(),
            root.location().label().dimmed()
        );
    }

    let mut shown = HashSet::new();
    shown.insert(graph.root());
    print_children(graph, graph.root(), "", &mut shown);

    println!();
    println!(
        "  {} influencing symbol(s), {} edge(s)",
        graph.total_references(),
        graph.edge_count()
    );
}

fn print_children(graph: &InsightGraph, node: NodeId, prefix: &str, shown: &mut HashSet<NodeId>) {
    let edges = graph.edges_from(node);
    let count = edges.len();
    for (i, (target, edge)) in edges.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└─" } else { "├─" };
        let Some(target_node) = graph.node(target) else {
            continue;
        };

        let already_shown = !shown.insert(target);
        let repeat_marker = if already_shown && !graph.edges_from(target).is_empty() {
            " …"
        } else {
            ""
        };
        println!(
            "{}{} {} {} {} — {}{}",
            prefix,
            branch,
            relation_colored(edge.relation()),
            target_node.name().bold(),
            format!("({})", target_node.kind()).dimmed(),
            edge.origin().label().dimmed(),
            repeat_marker.dimmed()
        );

        if !already_shown {
            let child_prefix = format!("{}{}", prefix, if last { "   " } else { "│  " });
            print_children(graph, target, &child_prefix, shown);
        }
    }
}

fn relation_colored(relation: Relation) -> ColoredString {
    match relation {
        Relation::Initialization => relation.label().green(),
        Relation::Assignment => relation.label().yellow(),
        Relation::ReturnContributor => relation.label().blue(),
        Relation::ParameterMapping => relation.label().magenta(),
        Relation::ObjectInitializer => relation.label().cyan(),
        Relation::Override => relation.label().purple(),
    }
}
