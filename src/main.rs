use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rust_apiscaffold::model::{parse_schema, SchemaObject};
use rust_apiscaffold::naming::{SqlServerTypeResolver, TypeResolver};
use rust_apiscaffold::project::build_features;
use rust_apiscaffold::{scaffold_project, ScaffoldOptions};

#[derive(Parser)]
#[command(name = "rust-apiscaffold")]
#[command(author, version, about = "Scaffold ASP.NET Core Web APIs from SQL Server schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Web API source tree described by a scaffold project file
    Scaffold {
        /// Path to the scaffold project file
        #[arg(short, long)]
        project: PathBuf,

        /// Output directory (defaults to the project file's <OutputDirectory>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files whose content differs
        #[arg(short, long)]
        force: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the features, objects and column types of a schema snapshot
    Inspect {
        /// Path to the schema XML file
        #[arg(short, long)]
        schema: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scaffold {
            project,
            output,
            force,
            verbose,
        } => {
            init_logging(verbose);
            let options = ScaffoldOptions {
                project_path: project,
                output_path: output,
                force,
            };

            let report = scaffold_project(options)?;
            println!("{}", report);
        }
        Commands::Inspect { schema, verbose } => {
            init_logging(verbose);
            let database = parse_schema(&schema)?;
            database.validate()?;
            let types = SqlServerTypeResolver;

            for feature in build_features(&database) {
                println!("{}", feature.name);
                for object in &feature.db_objects {
                    let Some(found) = database.find_object(object) else {
                        continue;
                    };
                    println!("  {} ({})", object.full_name(), object.kind.as_str());
                    for column in found.columns() {
                        let ty = types.resolve(&database, &object.full_name(), column)?;
                        println!("    {} {} -> {}", column.name, column.data_type, ty);
                    }
                }
            }
        }
    }

    Ok(())
}
