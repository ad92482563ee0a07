use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use trec_core::{
    finalize_page_numbers, populate_header, populate_sections, remove_empty_sections, resolve_slot,
};
use trec_document::Document;
use trec_types::InspectionReport;

#[derive(Parser)]
#[command(name = "trec")]
#[command(about = "Fill a standardized inspection form from a report export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate a form template from a JSON inspection report
    Fill {
        /// Inspection report JSON file
        report: PathBuf,
        /// HTML form template
        template: PathBuf,
        /// Output path for the filled form
        #[arg(short, long, default_value = "trec_report_filled.html")]
        output: PathBuf,
        /// Keep sections that ended up with no findings or checkboxes
        #[arg(long)]
        keep_empty_sections: bool,
    },
    /// Show which form slot a line-item name resolves to
    Map {
        /// Line-item name as it appears in the report
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trec=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fill {
            report,
            template,
            output,
            keep_empty_sections,
        } => fill(&report, &template, &output, keep_empty_sections),
        Commands::Map { name } => {
            match resolve_slot(&name) {
                Some(slot) => println!(
                    "{} -> section {}, item {} ({})",
                    name, slot.section_index, slot.item_code, slot.canonical_title
                ),
                None => println!("{} -> no slot mapping", name),
            }
            Ok(())
        }
    }
}

fn fill(
    report_path: &Path,
    template_path: &Path,
    output_path: &Path,
    keep_empty_sections: bool,
) -> anyhow::Result<()> {
    let report_json = fs::read_to_string(report_path)
        .with_context(|| format!("reading report {}", report_path.display()))?;
    let report: InspectionReport = serde_json::from_str(&report_json)
        .with_context(|| format!("parsing report {}", report_path.display()))?;

    let template_html = fs::read_to_string(template_path)
        .with_context(|| format!("reading template {}", template_path.display()))?;
    let mut doc = Document::parse(&template_html);

    populate_header(&mut doc, &report);
    populate_sections(&mut doc, &report)
        .with_context(|| format!("populating template {}", template_path.display()))?;
    if !keep_empty_sections {
        remove_empty_sections(&mut doc);
    }
    finalize_page_numbers(&mut doc);

    fs::write(output_path, doc.serialize())
        .with_context(|| format!("writing {}", output_path.display()))?;
    println!("Wrote {}", output_path.display());
    Ok(())
}
