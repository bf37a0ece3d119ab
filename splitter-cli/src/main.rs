use anyhow::Result;
use clap::Parser;
use std::path::Path;

// Import from splitter-core
use splitter_core::rules::DESCRIPTORS;
use splitter_core::{ProcessedReport, SplitProcessor, StepProfiler};

// Import CLI utilities
use splitter_cli::config_locator::load_config;
use splitter_cli::logging;
use splitter_cli::output::{default_summary_path, output_path, write_outputs};

#[derive(Parser)]
#[command(name = "report-splitter")]
#[command(about = "Split AU/NZ warehouse report exports into one worksheet per warehouse")]
struct Args {
    /// Path to the .xlsx/.xls report export
    #[arg(short, long, required_unless_present = "list_types")]
    input: Option<String>,

    /// Output workbook path (if not specified, generated inside --output-dir)
    #[arg(short, long)]
    output: Option<String>,

    /// Directory for the generated output workbook
    #[arg(long, default_value = ".")]
    output_dir: String,

    /// Report type label, e.g. "Sales Item AU" (skips file name classification)
    #[arg(short = 't', long)]
    report_type: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the JSON processing summary to this path
    #[arg(long)]
    summary: Option<String>,

    /// List supported report types with their segment rules and exit
    #[arg(long)]
    list_types: bool,

    /// Enable per-step timing of the pipeline
    #[arg(long)]
    profile: bool,

    /// Log filter, e.g. "debug" or "splitter_core=trace" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.log_level.as_deref())?;

    println!("🦀 Report Splitter");

    if args.list_types {
        show_report_types();
        return Ok(());
    }

    if let Err(e) = run(&args) {
        eprintln!("❌ Processing failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--input is required"))?;

    let (config, source) = load_config(args.config.as_deref());
    println!("📋 {}", source.describe());

    if !Path::new(input).exists() {
        anyhow::bail!("Input file not found at: {input}");
    }

    let processor = SplitProcessor::new_xlsx()?;
    let mut profiler = StepProfiler::new(args.profile);

    println!("📄 Processing: {input}");
    let report = processor.process_file_with_options(
        Path::new(input),
        args.report_type.as_deref(),
        &config,
        &mut profiler,
    )?;

    print_summary(&report);

    let workbook_path = output_path(args.output.as_deref(), &args.output_dir, &report.summary.filename);
    let summary_path = match &args.summary {
        Some(path) => Some(Path::new(path).to_path_buf()),
        None if config.write_summary => Some(default_summary_path(&workbook_path)),
        None => None,
    };

    write_outputs(&report, &workbook_path, summary_path.as_deref())?;
    println!("💾 Workbook saved to: {}", workbook_path.display());
    if let Some(path) = &summary_path {
        println!("💾 Summary saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &ProcessedReport) {
    let summary = &report.summary;
    println!("✅ Successfully processed {} as {}", summary.source_filename, summary.report_type);
    println!(
        "🕒 Processed at {}",
        summary
            .processed_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    println!("📊 Original rows: {}", summary.original_rows);
    for worksheet in &summary.worksheets {
        println!("   - {}: {} rows", worksheet.name, worksheet.rows);
    }
}

fn show_report_types() {
    println!("\n📋 Supported Report Types:");
    for descriptor in DESCRIPTORS.iter() {
        println!("\n  {}", descriptor.report_type);
        println!("    {}", descriptor.description);
        println!("    File name keywords: {}", descriptor.keywords.join(", "));
        if let Some(derived) = &descriptor.derived {
            println!("    Derived column: {} = {}", derived.name, derived.sum_of.join(" + "));
        }
        if let Some(columns) = descriptor.projection {
            println!("    Output columns: {}", columns.join(", "));
        }
        for rule in descriptor.rules {
            println!("    • {}", rule.describe());
        }
    }

    println!("\n📝 Usage Examples:");
    println!("  report-splitter -i \"Inventory Enquiry AU.xlsx\"");
    println!("  report-splitter -i export.xlsx -t \"Sales Item NZ\" --output-dir out/");
    println!("  report-splitter -i \"Purchase Item AU.xlsx\" --summary summary.json --profile");
}
