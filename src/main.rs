use clap::{Parser, Subcommand};
use gita_pages::{config, export, output, pipeline};
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
struct ShapeArgs {
    /// Fail on sections that match neither content shape instead of skipping them
    #[arg(long)]
    strict: bool,
}

#[derive(Parser)]
#[command(name = "gita-pages")]
#[command(about = "Generates the narrated shloka page for the Android app")]
#[command(long_about = "\
Generates the narrated shloka page for the Android app

Section files are read from the content directory in numeric-prefix order
and combined into one self-contained HTML page.

Content structure:

  content/
  ├── config.toml          # Site config (optional)
  ├── 001-anger.json       # [ { \"title\": \"...\", \"shlokas\": [ ... ] } ]
  ├── 002-fear.json        # [ { \"<title>\": [ { \"chapter\": 2, \"verse\": 47, ... } ] } ]
  └── 010-duty.json        # Unwrapped objects work too

Shloka fields:
  titled sections:  problem, reference, text, meaning, example
  title maps:       chapter, verse, sanskrit, hindi_arth, udaharan

Run 'gita-pages gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory, or a single JSON file of sections
    #[arg(long, default_value = "content", global = true)]
    content: PathBuf,

    /// Output file (overrides output.path in config.toml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: load → flatten → render → publish
    Build {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Open the generated page in the default viewer
        #[arg(long)]
        open: bool,
        /// With --output, still delete output.legacy_path
        #[arg(long)]
        remove_legacy: bool,
    },
    /// Validate content and list what would be published
    Check(ShapeArgs),
    /// Print the flattened records as JSON
    Flatten(ShapeArgs),
    /// Write the records as plain text
    Export {
        /// Destination file
        #[arg(long, default_value = export::DEFAULT_EXPORT_FILE)]
        to: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            shape,
            open,
            remove_legacy,
        } => {
            println!("==> Stage 1: Loading {}", cli.content.display());
            let loaded = pipeline::load(&cli.content, shape.strict)?;
            output::print_inventory(
                &loaded.store,
                &loaded.flattened,
                loaded.config.page.page_size,
            );

            let (path, _) =
                pipeline::output_paths(&loaded.config, cli.output.as_deref(), remove_legacy);
            println!("==> Stage 2: Rendering → {}", path.display());
            let report = pipeline::build(&loaded, cli.output.as_deref(), remove_legacy)?;
            output::print_publish_report(&report);

            if open {
                if let Err(e) = gita_pages::publish::open_in_viewer(&report.path) {
                    eprintln!("warning: could not open {}: {}", report.path.display(), e);
                }
            }
            println!("==> Build complete: {}", report.path.display());
        }
        Command::Check(shape) => {
            println!("==> Checking {}", cli.content.display());
            let loaded = pipeline::load(&cli.content, shape.strict)?;
            output::print_inventory(
                &loaded.store,
                &loaded.flattened,
                loaded.config.page.page_size,
            );
            println!("==> Content is valid");
        }
        Command::Flatten(shape) => {
            let loaded = pipeline::load(&cli.content, shape.strict)?;
            let json = serde_json::to_string_pretty(&loaded.flattened.records)?;
            println!("{}", json);
        }
        Command::Export { to } => {
            let loaded = pipeline::load(&cli.content, false)?;
            let written = export::export_to_txt(&loaded.flattened.records, &to)?;
            output::print_export_report(&written, loaded.flattened.records.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
