//! Graph Explorer CLI: explore a graph service from the terminal
//!
//! Talks to a running graph service over HTTP, or to the built-in sample graph
//! with `--demo`.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use graph_explorer::{
    Explorer, ExplorerConfig, FetchOutcome, GraphService, InMemoryGraphService, NodeId,
    NodeSummary, RemoteGraphService,
};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "graph-explorer", version, about = "Entity-relationship graph explorer")]
struct Cli {
    /// Graph service URL (overrides the config file)
    #[arg(long, global = true, env = "GRAPH_EXPLORER_URL")]
    url: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Use the built-in sample graph instead of a service
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search nodes by text
    Search {
        text: String,
    },
    /// Load a node's neighborhood, then expand further nodes in place
    Explore {
        node_id: String,

        /// Hops per fetch (1-3)
        #[arg(long)]
        depth: Option<u8>,

        /// Nodes to expand after the initial load, in order
        #[arg(long = "expand")]
        expand: Vec<String>,
    },
    /// Shortest path between two nodes
    Path {
        start: String,
        end: String,

        #[arg(long)]
        max_depth: Option<u8>,
    },
    /// Check that the service is reachable
    Ping,
    /// Start an interactive exploration shell
    Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = match &cli.config {
        Some(path) => ExplorerConfig::from_file(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.service_url = url.clone();
    }

    let service: Box<dyn GraphService> = if cli.demo {
        Box::new(InMemoryGraphService::sample())
    } else {
        Box::new(RemoteGraphService::new(&config.service_url, config.request_timeout())?)
    };
    let service = service.as_ref();

    match cli.command {
        Commands::Search { text } => {
            let mut explorer = Explorer::new(config);
            let candidates = explorer.search(service, &text).await.to_vec();
            fail_on_notice(&explorer)?;
            print_candidates(&candidates, &cli.format)
        }
        Commands::Explore { node_id, depth, expand } => {
            let mut explorer = Explorer::new(config);
            if let Some(depth) = depth {
                explorer.set_depth(depth)?;
            }
            run_explore(&mut explorer, service, &node_id, &expand).await?;
            print_graph(&explorer, &cli.format)
        }
        Commands::Path { start, end, max_depth } => {
            if let Some(max_depth) = max_depth {
                config.path_max_depth = max_depth;
            }
            let mut explorer = Explorer::new(config);
            run_path(&mut explorer, service, &start, &end).await?;
            print_graph(&explorer, &cli.format)
        }
        Commands::Ping => {
            service.ping().await?;
            println!("PONG");
            Ok(())
        }
        Commands::Shell => run_shell(Explorer::new(config), service, &cli.format).await,
    }
}

async fn run_explore(
    explorer: &mut Explorer,
    service: &dyn GraphService,
    node_id: &str,
    expand: &[String],
) -> CliResult<()> {
    into_result(explorer.load(service, node_id).await)?;
    for id in expand {
        into_result(explorer.expand(service, &NodeId::new(id.as_str())).await?)?;
    }
    Ok(())
}

async fn run_path(
    explorer: &mut Explorer,
    service: &dyn GraphService,
    start: &str,
    end: &str,
) -> CliResult<()> {
    into_result(explorer.load(service, start).await)?;
    into_result(explorer.find_path(service, &NodeId::new(start), end).await?)?;
    Ok(())
}

fn into_result(outcome: FetchOutcome) -> CliResult<()> {
    match outcome {
        FetchOutcome::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}

fn fail_on_notice(explorer: &Explorer) -> CliResult<()> {
    match explorer.notice() {
        Some(notice) => Err(notice.message.clone().into()),
        None => Ok(()),
    }
}

fn print_candidates(candidates: &[NodeSummary], format: &OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(candidates)?);
        }
        OutputFormat::Table => {
            if candidates.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["id", "type", "label"]);
            for candidate in candidates {
                table.add_row(vec![
                    candidate.id.to_string(),
                    candidate.node_type.to_string(),
                    candidate.label.clone(),
                ]);
            }
            println!("{}", table);
            println!("{} candidate(s)", candidates.len());
        }
    }
    Ok(())
}

fn print_graph(explorer: &Explorer, format: &OutputFormat) -> CliResult<()> {
    let store = explorer.store();

    match format {
        OutputFormat::Json => {
            let nodes: Vec<serde_json::Value> = store
                .nodes()
                .map(|node| {
                    let position = explorer.position(&node.id);
                    serde_json::json!({
                        "node": node,
                        "x": position.map(|p| p.x),
                        "y": position.map(|p| p.y),
                    })
                })
                .collect();
            let edges: Vec<_> = store.edges().collect();
            let output = serde_json::json!({
                "selected": store.selected(),
                "nodes": nodes,
                "edges": edges,
                "dropped_edges": store.dropped_edges_total(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            let mut nodes = Table::new();
            nodes.set_content_arrangement(ContentArrangement::Dynamic);
            nodes.set_header(vec!["id", "type", "label", "x", "y"]);
            for node in store.nodes() {
                let (x, y) = explorer
                    .position(&node.id)
                    .map(|p| (format!("{:.1}", p.x), format!("{:.1}", p.y)))
                    .unwrap_or_default();
                let marker = if store.selected() == Some(&node.id) { "*" } else { "" };
                nodes.add_row(vec![
                    format!("{}{}", marker, node.id),
                    node.node_type.to_string(),
                    node.display_label().to_string(),
                    x,
                    y,
                ]);
            }
            println!("{}", nodes);

            let mut edges = Table::new();
            edges.set_content_arrangement(ContentArrangement::Dynamic);
            edges.set_header(vec!["id", "source", "type", "target"]);
            for edge in store.edges() {
                edges.add_row(vec![
                    edge.id.to_string(),
                    edge.source.to_string(),
                    edge.edge_type.to_string(),
                    edge.target.to_string(),
                ]);
            }
            println!("{}", edges);

            println!("{} node(s), {} edge(s)", store.node_count(), store.edge_count());
            if let Some(notice) = explorer.notice() {
                println!("Note: {}", notice.message);
            }
        }
    }
    Ok(())
}

fn print_details(explorer: &Explorer) {
    let Some(details) = explorer.details() else {
        println!("(nothing selected)");
        return;
    };

    println!("{} [{}] {}", details.node.id, details.node.node_type, details.node.display_label());
    for (key, value) in &details.node.properties {
        println!("  {} = {}", key, value);
    }
    println!("Connected:");
    for node in &details.connected {
        println!("  {} {}", node.id, node.display_label());
    }
}

async fn run_shell(
    mut explorer: Explorer,
    service: &dyn GraphService,
    format: &OutputFormat,
) -> CliResult<()> {
    println!("Graph Explorer Shell");
    println!("Type :help for commands. :quit to exit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        eprint!("explore> ");

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let result: CliResult<()> = match (command, args.as_slice()) {
            (":quit" | ":exit" | ":q", _) => break,
            (":help" | ":h", _) => {
                println!("Commands:");
                println!("  :search <text>       Find candidate nodes");
                println!("  :open <id>           Load a node's neighborhood (replaces the graph)");
                println!("  :expand <id>         Add a node's neighborhood to the graph");
                println!("  :path <from> <to>    Add a shortest path to the graph");
                println!("  :select <id>         Show a node's details");
                println!("  :depth <1-3>         Hops per fetch");
                println!("  :show                Print the current graph");
                println!("  :relayout            Lay the graph out from scratch");
                println!("  :quit                Exit shell");
                Ok(())
            }
            (":search", words) if !words.is_empty() => {
                let candidates = explorer.search(service, &words.join(" ")).await.to_vec();
                print_candidates(&candidates, format)
            }
            (":open", [id]) => {
                explorer.load(service, *id).await;
                print_details(&explorer);
                Ok(())
            }
            (":expand", [id]) => match explorer.expand(service, &NodeId::new(*id)).await {
                Ok(FetchOutcome::Applied(report)) => {
                    println!("{} new node(s)", report.new_nodes.len());
                    Ok(())
                }
                Ok(_) => Ok(()),
                Err(e) => Err(e.into()),
            },
            (":path", [from, to]) => explorer
                .find_path(service, &NodeId::new(*from), *to)
                .await
                .map(|_| ())
                .map_err(Into::into),
            (":select", [id]) => {
                explorer.select(&NodeId::new(*id));
                print_details(&explorer);
                Ok(())
            }
            (":depth", [hops]) => match hops.parse::<u8>() {
                Ok(hops) => explorer.set_depth(hops).map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            (":show", _) => print_graph(&explorer, format),
            (":relayout", _) => {
                explorer.relayout();
                Ok(())
            }
            _ => Err(format!("unknown command: {} (try :help)", line.trim()).into()),
        };

        if let Err(e) = result {
            eprintln!("Error: {}", e);
        }
        if let Some(notice) = explorer.notice() {
            eprintln!("Note: {}", notice.message);
            explorer.dismiss_notice();
        }
    }

    println!("Bye!");
    Ok(())
}
