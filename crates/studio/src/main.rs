//! `iconforge-studio` -- interactive terminal session for the mutation graph.
//!
//! Reads line-oriented commands from stdin, drives the [`MutationGraph`]
//! controller, and talks to the generation engine over HTTP. Mutations run
//! in the background: the prompt stays responsive while a request is in
//! flight, and the outcome is printed when it lands.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                     |
//! |------------------------|----------|-------------------------|---------------------------------|
//! | `ENGINE_URL`           | no       | `http://localhost:8000` | Engine base HTTP URL            |
//! | `REQUEST_TIMEOUT_SECS` | no       | `120`                   | HTTP timeout per engine call    |
//! | `BRAND_GRID`           | no       | `24`                    | Icon grid size in pixels        |
//! | `BRAND_STROKE_WIDTH`   | no       | `2.0`                   | Stroke width in grid units      |
//! | `BRAND_STYLE`          | no       | `outline`               | `outline` or `filled`           |

mod config;

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iconforge_engine::EngineApi;
use iconforge_graph::MutationGraph;

use config::StudioConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "iconforge_studio=info,iconforge_graph=info,iconforge_engine=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = StudioConfig::from_env();
    tracing::info!(
        engine_url = %config.engine_url,
        grid = config.constraints.grid,
        "Loaded studio configuration"
    );

    // --- Engine client ---
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let engine = EngineApi::with_client(client, config.engine_url.clone());

    // --- Graph controller ---
    let graph = Arc::new(MutationGraph::new(engine.clone()));

    run_session(graph, engine, &config).await
}

/// The interactive command loop.
async fn run_session(
    graph: Arc<MutationGraph<EngineApi>>,
    engine: EngineApi,
    config: &StudioConfig,
) -> Result<()> {
    print_help();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,

            "generate" => {
                if rest.is_empty() {
                    println!("describe the icon to continue");
                    continue;
                }
                match engine.generate(rest, &config.constraints).await {
                    Ok(variants) => {
                        let count = variants.len();
                        let first = variants.into_iter().next().unwrap_or_default();
                        match graph.create_root(first).await {
                            Ok(id) => println!("root {id} created ({count} variant(s) returned)"),
                            Err(e) => println!("root creation failed: {e}"),
                        }
                    }
                    Err(e) => println!("generate failed: {e}"),
                }
            }

            "root" => {
                if rest.is_empty() {
                    println!("usage: root <path.svg>");
                    continue;
                }
                match tokio::fs::read_to_string(rest).await {
                    Ok(svg) => match graph.create_root(svg.trim().to_string()).await {
                        Ok(id) => println!("root {id} created from {rest}"),
                        Err(e) => println!("root creation failed: {e}"),
                    },
                    Err(e) => println!("could not read {rest}: {e}"),
                }
            }

            "list" => {
                let active = graph.active_node_id().await;
                for (index, node) in graph.nodes().await.iter().enumerate() {
                    let marker = match (node.pending, active.as_deref() == Some(&node.id)) {
                        (true, _) => "~",
                        (_, true) => "*",
                        _ => " ",
                    };
                    println!("{marker} [{index}] {}  {}", node.id, node.label);
                }
            }

            "tree" => print!("{}", graph.render_tree().await),

            "show" => match resolve_node(&graph, rest).await {
                Ok(id) => {
                    let node = graph
                        .nodes()
                        .await
                        .into_iter()
                        .find(|n| n.id == id)
                        .context("node disappeared while resolving")?;
                    if node.pending {
                        println!("(still generating)");
                    } else {
                        println!("{}", node.svg);
                    }
                }
                Err(e) => println!("{e}"),
            },

            "edit" => match resolve_node(&graph, rest).await {
                Ok(id) => match graph.begin_edit(&id).await {
                    Ok(()) => println!("editing {id}"),
                    Err(e) => println!("{e}"),
                },
                Err(e) => println!("{e}"),
            },

            "cancel" => {
                graph.cancel_edit().await;
                println!("editor closed");
            }

            "mutate" => {
                let Some((node_ref, instruction)) = rest.split_once(char::is_whitespace) else {
                    println!("usage: mutate <node> <instruction>");
                    continue;
                };
                match resolve_node(&graph, node_ref).await {
                    Ok(id) => {
                        let graph = Arc::clone(&graph);
                        let instruction = instruction.trim().to_string();
                        tokio::spawn(async move {
                            match graph.commit_mutation(&id, &instruction).await {
                                Ok(child) => println!("\nmutation committed: node {child}"),
                                Err(e) => println!("\nmutation failed: {e}"),
                            }
                        });
                        println!("mutation submitted; a pending node is on the canvas");
                    }
                    Err(e) => println!("{e}"),
                }
            }

            "connect" => {
                let Some((source_ref, target_ref)) = rest.split_once(char::is_whitespace) else {
                    println!("usage: connect <source> <target>");
                    continue;
                };
                let source = resolve_node(&graph, source_ref).await;
                let target = resolve_node(&graph, target_ref.trim()).await;
                match (source, target) {
                    (Ok(source), Ok(target)) => match graph.connect(&source, &target).await {
                        Ok(()) => println!("connected {source} -> {target}"),
                        Err(e) => println!("{e}"),
                    },
                    (Err(e), _) | (_, Err(e)) => println!("{e}"),
                }
            }

            other => println!("unknown command '{other}' (try 'help')"),
        }
    }

    Ok(())
}

/// Resolve a node reference: a list index, or a unique id prefix.
async fn resolve_node(graph: &MutationGraph<EngineApi>, token: &str) -> Result<String> {
    if token.is_empty() {
        bail!("missing node reference (use 'list' to see nodes)");
    }
    let nodes = graph.nodes().await;
    if let Ok(index) = token.parse::<usize>() {
        return nodes
            .get(index)
            .map(|n| n.id.clone())
            .with_context(|| format!("no node at index {index}"));
    }
    let matches: Vec<&str> = nodes
        .iter()
        .filter(|n| n.id.starts_with(token))
        .map(|n| n.id.as_str())
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => bail!("no node matches '{token}'"),
        _ => bail!("'{token}' is ambiguous ({} matches)", matches.len()),
    }
}

fn print_help() {
    println!("commands:");
    println!("  generate <prompt>            create a root icon from a text prompt");
    println!("  root <path.svg>              create a root icon from a local file");
    println!("  list                         list nodes (~ pending, * editing)");
    println!("  tree                         show the version tree");
    println!("  show <node>                  print a node's SVG");
    println!("  edit <node> / cancel         open or close the edit affordance");
    println!("  mutate <node> <instruction>  derive a new version (runs in background)");
    println!("  connect <source> <target>    add a manual edge");
    println!("  quit");
}
