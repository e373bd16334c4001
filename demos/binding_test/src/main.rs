use cef_binding::{BindingTestExtension, JsEngineBuilder};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "binding_test")]
#[command(about = "Run scripts with the cef_test binding installed")]
struct Cli {
    /// Disable the console, timer and microtask runtime extensions
    #[arg(long)]
    no_runtime: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate inline JavaScript
    Eval {
        /// The code to evaluate
        code: String,
    },
    /// Run a JavaScript file
    Run {
        /// Path to .js file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let cli = Cli::parse();

    let source = match cli.command {
        Commands::Eval { code } => code,
        Commands::Run { file } => match fs::read_to_string(&file) {
            Ok(code) => {
                log::info!("Running: {}", file.display());
                code
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                return ExitCode::FAILURE;
            }
        },
    };

    let engine = JsEngineBuilder::new()
        .with_runtime_extensions(!cli.no_runtime)
        .with_extension(BindingTestExtension)
        .build()
        .spawn();

    let result = engine.client().evaluate(source);
    engine.join();

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
