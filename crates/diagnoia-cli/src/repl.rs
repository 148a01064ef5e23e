//! Interactive question loop

use diagnoia_core::composer::Assistant;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const EXIT_COMMANDS: [&str; 4] = ["/salir", "salir", "exit", "/exit"];

const EXAMPLES: [&str; 6] = [
    "Listar pacientes",
    "¿Qué pacientes necesitan atención?",
    "Mostrame los pacientes nuevos",
    "Mostrame los síntomas del paciente PAC_004",
    "Qué enfermedad tiene PAC_004",
    "Qué riesgo y prioridad tiene PAC_004",
];

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim().to_lowercase();
    EXIT_COMMANDS.contains(&line.as_str())
}

fn print_banner() {
    println!("=== Asistente DiagnOIA (Neo4j + Ollama) ===");
    println!("Preguntas ejemplo:");
    for example in EXAMPLES {
        println!("- {}", example);
    }
    println!();
}

/// Read questions until an exit command, Ctrl-C or Ctrl-D.
///
/// A failed collaborator call ends the current turn only.
pub async fn run(assistant: &Assistant, quiet: bool) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;

    if !quiet {
        print_banner();
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if is_exit_command(question) {
                    println!("Chau!");
                    break;
                }
                rl.add_history_entry(question).ok();

                match assistant.respond(question).await {
                    Ok(reply) => println!("{}\n", reply),
                    Err(e) => {
                        eprintln!("Error [{}]: {}", e.code(), e);
                        if let Some(hint) = e.suggestion() {
                            eprintln!("  Sugerencia: {}", hint);
                        }
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nChau!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
