use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use specsheet_core::{BatchProcessor, ExtractionConfig, FileReporter, COMPLETION_MESSAGE};

#[derive(Parser)]
#[command(name = "specsheet")]
#[command(about = "Extract construction fields from PDF spec sheets into one CSV file")]
struct Args {
    /// Path to config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory containing the PDF files (overrides config)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// CSV file to write (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagnostic log file, appended to on every run (overrides config)
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Language model name (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("🏗️  Specsheet Extractor");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let mut config = ExtractionConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }
    apply_overrides(&mut config, &args);

    if config.llm.api_key().is_none() {
        println!(
            "⚠️  {} is not set: every document will be skipped and logged",
            config.llm.api_key_env
        );
    }
    let processor = BatchProcessor::new_cli(&config.llm);

    let reporter = FileReporter::open(&config.log_file)?;

    println!("📂 Input directory: {}", config.input_dir.display());
    println!("🤖 Model: {}", config.llm.model);

    match processor.run(&config.input_dir, &config.output_csv, &reporter) {
        Ok(summary) => {
            println!("📊 Documents:");
            println!("   - Found: {}", summary.candidates);
            println!("   - Written: {}", summary.written);
            println!("   - Skipped: {}", summary.skipped());
            if summary.skipped() > 0 {
                println!("   ⚠️  See {} for details", reporter.path().display());
            }
            println!("💾 CSV saved to: {}", summary.output.display());
            println!("{COMPLETION_MESSAGE}");
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ExtractionConfig, args: &Args) {
    if let Some(input_dir) = &args.input_dir {
        config.input_dir = input_dir.clone();
    }
    if let Some(output) = &args.output {
        config.output_csv = output.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
}

fn show_help() {
    let defaults = ExtractionConfig::default();

    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>       Load custom config file");
    println!("  --input-dir <path>    Directory of PDFs (default: {})", defaults.input_dir.display());
    println!("  --output <path>       CSV output file (default: {})", defaults.output_csv.display());
    println!("  --log-file <path>     Diagnostic log (default: {})", defaults.log_file.display());
    println!("  --model <name>        Language model (default: {})", defaults.llm.model);

    println!("\n📄 Config file (YAML, every key optional):");
    println!("  input_dir: file");
    println!("  output_csv: xyz2.csv");
    println!("  log_file: extraction_log.txt");
    println!("  llm:");
    println!("    endpoint: {}", defaults.llm.endpoint);
    println!("    model: {}", defaults.llm.model);
    println!("    api_key_env: {}", defaults.llm.api_key_env);
    println!("    # timeout_secs: 120   (optional, unset by default)");

    println!("\n📝 Usage Examples:");
    println!("  export {}=sk-...", defaults.llm.api_key_env);
    println!("  cargo run -- -i ./specs -o result.csv");
    println!("  cargo run -- -c specsheet.yaml");
    println!("  RUST_LOG=debug cargo run");
}
