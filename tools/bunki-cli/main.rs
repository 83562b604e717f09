use bunki::prelude::*;
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;

/// Validate a flowchart definition and print its node table.
#[derive(Parser)]
#[command(
    name = "bunki-cli",
    about = "Builds a flowchart definition and reports its structure"
)]
struct Cli {
    /// Path to the definition file (JSON; YAML with the `yaml` feature)
    definition: String,

    /// Fail when any declared case is left unhandled
    #[arg(long)]
    strict: bool,

    /// Checker id assumed for nodes that do not declare one
    #[arg(long)]
    default_checker: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let content = match fs::read_to_string(&cli.definition) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read definition file '{}': {}", cli.definition, e);
            process::exit(1);
        }
    };

    let definition = match parse_definition(&cli.definition, &content) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Failed to parse '{}': {}", cli.definition, e);
            process::exit(1);
        }
    };

    let mut builder = FlowchartBuilder::new(definition);
    if cli.strict {
        builder = builder.allow_unhandled_cases(false);
    }
    if let Some(checker) = &cli.default_checker {
        builder = builder.default_checker(checker);
    }

    let flowchart = match builder.build() {
        Ok(flowchart) => flowchart,
        Err(e) => {
            eprintln!("Build failed: {}", e);
            process::exit(1);
        }
    };

    println!("Flowchart built successfully.");
    println!("Entrypoint: {}", flowchart.entrypoint.id);
    println!();
    println!("Nodes:");

    let mut nodes: Vec<_> = flowchart.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    for node in nodes {
        let label = node.label.as_deref().unwrap_or("-");
        let cases = node
            .cases
            .declared()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} (checker: {}, cases: [{}], label: {})",
            node.id, node.checker_id, cases, label
        );
        let unhandled = node.cases.unhandled();
        if !unhandled.is_empty() {
            let unhandled = unhandled
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("    unhandled: [{}]", unhandled);
        }
    }
}

fn parse_definition(path: &str, content: &str) -> Result<FlowchartDefinition, String> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "yaml" | "yml" => parse_yaml(content),
        _ => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> Result<FlowchartDefinition, String> {
    bunki::definition::from_yaml_str(content).map_err(|e| e.to_string())
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> Result<FlowchartDefinition, String> {
    Err("YAML support requires the `yaml` feature".to_owned())
}
