//! DiagnOIA CLI - clinical questions over a Neo4j knowledge graph

mod repl;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use diagnoia_core::catalog::{PriorityEntry, QueryCatalog};
use diagnoia_core::composer::{Assistant, ResponseMode};
use diagnoia_core::config::Config;
use diagnoia_core::graph::Neo4jClient;
use diagnoia_core::llm::{LanguageModel, OllamaClient};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "diagnoia")]
#[command(author, version, about = "Clinical assistant over a Neo4j knowledge graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive question loop (default)
    Chat {
        /// Answer with the formatted data instead of a model narration
        #[arg(long)]
        direct: bool,
    },

    /// Answer a single question and exit
    Ask {
        /// The question, in Spanish
        #[arg(required = true)]
        question: Vec<String>,
        /// Answer with the formatted data instead of a model narration
        #[arg(long)]
        direct: bool,
    },

    /// Show patients ordered by clinical priority
    Priority,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,

    /// Open the TUI dashboard
    Dashboard,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn response_mode(direct: bool) -> ResponseMode {
    if direct {
        ResponseMode::Direct
    } else {
        ResponseMode::Narrated
    }
}

fn build_assistant(config: &Config, mode: ResponseMode) -> anyhow::Result<Assistant> {
    let graph = Neo4jClient::from_config(&config.graph)?;
    let model = OllamaClient::new(config.llm.clone())?;
    Ok(Assistant::new(Arc::new(graph), Arc::new(model)).with_mode(mode))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("diagnoia=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat { direct: false }) {
        Commands::Chat { direct } => cmd_chat(direct, cli.quiet).await,

        Commands::Ask { question, direct } => {
            cmd_ask(&question.join(" "), direct, cli.format).await
        }

        Commands::Priority => cmd_priority(cli.format).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),

        Commands::Doctor => cmd_doctor(cli.quiet).await,

        Commands::Dashboard => cmd_dashboard(cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_chat(direct: bool, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let assistant = build_assistant(&config, response_mode(direct))?;
    info!(model = %config.llm.model, graph = %config.graph.uri, "Starting chat");
    repl::run(&assistant, quiet).await
}

async fn cmd_ask(question: &str, direct: bool, format: OutputFormat) -> anyhow::Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("La pregunta está vacía");
    }

    let config = Config::load()?;
    let assistant = build_assistant(&config, response_mode(direct))?;
    let reply = assistant.respond(question).await?;

    match format {
        OutputFormat::Text => println!("{}", reply),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reply)?),
    }
    Ok(())
}

async fn cmd_priority(format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;
    let graph = Neo4jClient::from_config(&config.graph)?;
    let ranking = QueryCatalog::new(Arc::new(graph)).priority_ranking().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranking)?),
        OutputFormat::Text => print_priority_table(&ranking),
    }
    Ok(())
}

fn print_priority_table(ranking: &[PriorityEntry]) {
    if ranking.is_empty() {
        println!("No hay pacientes registrados.");
        return;
    }

    println!(
        "{:>5}  {:<10} {:<14} {:<16} {:<20} {:<18} Acciones",
        "Orden", "Paciente", "Nombre", "Apellido", "Enfermedad", "Prioridad"
    );
    for entry in ranking {
        println!(
            "{:>5}  {:<10} {:<14} {:<16} {:<20} {:<18} {}",
            entry.rank,
            entry.patient.id,
            entry.patient.given_name,
            entry.patient.family_name,
            entry.condition.as_deref().unwrap_or("-"),
            entry.priority.label(),
            entry.actions.join(", ")
        );
    }
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_file()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("DiagnOIA Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            println!("[!!] Configuration: Error - {}", e);
            return Ok(());
        }
    };

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }
    }

    match config.graph.redacted_password() {
        Ok(Some(redacted)) => {
            if !quiet {
                println!("[OK] Neo4j password: Configured ({})", redacted);
            }
        }
        Ok(None) => {
            all_ok = false;
            warn!("Neo4j password: Not configured");
            if !quiet {
                println!("[!!] Neo4j password: Not configured");
                println!("     Set DIAGNOIA_NEO4J_PASSWORD or NEO4J_PASSWORD environment variable");
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Neo4j password: Error - {}", e);
            }
        }
    }

    match Neo4jClient::from_config(&config.graph) {
        Ok(graph) => match graph.ping().await {
            Ok(()) => {
                if !quiet {
                    println!("[OK] Neo4j: Connected ({})", graph.endpoint());
                }
            }
            Err(e) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Neo4j: {} - {}", graph.endpoint(), e);
                    if let Some(hint) = e.suggestion() {
                        println!("     {}", hint);
                    }
                }
            }
        },
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Neo4j: Failed to initialize - {}", e);
            }
        }
    }

    match OllamaClient::new(config.llm.clone()) {
        Ok(llm) => match llm.list_models().await {
            Ok(models) if models.iter().any(|m| m == llm.model_name()) => {
                if !quiet {
                    println!("[OK] Ollama: {} ({})", llm.model_name(), llm.base_url());
                }
            }
            Ok(_) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Ollama: model '{}' is not pulled", llm.model_name());
                    println!("     Run `ollama pull {}`", llm.model_name());
                }
            }
            Err(e) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Ollama: {} - {}", llm.base_url(), e);
                }
            }
        },
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Ollama: Failed to initialize - {}", e);
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}

fn cmd_dashboard(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        info!("Starting dashboard...");
    }

    match std::process::Command::new("diagnoia-tui").status() {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => {
            if !quiet {
                println!("Dashboard exited with an error.");
            }
            Ok(())
        }
        Err(_) => {
            if !quiet {
                println!("Could not start the dashboard.");
                println!();
                println!("The binary 'diagnoia-tui' is not in your PATH.");
                println!("Either:");
                println!("  1. Add the target/debug or target/release directory to PATH");
                println!("  2. Run `cargo run --bin diagnoia-tui` from the project root");
                println!("  3. Install with `cargo install --path crates/diagnoia-tui`");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["diagnoia"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["diagnoia", "ask", "Listar", "pacientes", "--direct"]).unwrap();
        match cli.command {
            Some(Commands::Ask { question, direct }) => {
                assert_eq!(question.join(" "), "Listar pacientes");
                assert!(direct);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_response_mode_flag() {
        assert_eq!(response_mode(true), ResponseMode::Direct);
        assert_eq!(response_mode(false), ResponseMode::Narrated);
    }
}
