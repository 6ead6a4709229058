use std::env;
use std::fs;
use std::process;

use graph::{build_dag, EdgeType};

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: demo_graph FILE");
        eprintln!("  FILE holds the output of `jj log --reversed --color always --template ...`");
        process::exit(2);
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    };

    let dag = match build_dag(&text) {
        Ok(dag) => dag,
        Err(e) => {
            eprintln!("Error parsing graph: {}", e);
            process::exit(1);
        }
    };

    println!("Graph Demo");
    println!("==========\n");

    println!("Statistics:");
    let stats = dag.stats();
    println!("  Total commits: {}", stats.total_commits);
    println!("  Merge commits: {}", stats.merge_commits);
    println!("  Immutable commits: {}", stats.immutable_commits);
    println!("  Conflicted commits: {}", stats.conflicted_commits);
    println!();

    println!("Rows:");
    println!("─────");
    let ids = |rows: Vec<&graph::Row>| -> String {
        rows.iter().map(|r| r.change_id()).collect::<Vec<_>>().join(",")
    };
    for (index, row) in dag.rows().iter().enumerate() {
        let commit = &row.commit;
        println!(
            "{:>3}  col {:<2} {} {} {}",
            index,
            row.column,
            commit.change_id,
            commit.bookmarks.join(","),
            commit.description
        );
        println!(
            "       parents [{}] children [{}]",
            ids(dag.parents(index)),
            ids(dag.children(index))
        );
    }
    println!();

    println!("Edges:");
    println!("──────");
    for edge in dag.edges() {
        let kind = match edge.edge_type {
            EdgeType::Direct => "direct",
            EdgeType::Indirect => "indirect",
        };
        let id = |index: usize| dag.commit(index).map_or("?", |c| c.change_id.as_str());
        println!("  {} -> {} ({})", id(edge.from), id(edge.to), kind);
    }
}
