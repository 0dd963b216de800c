use base64::Engine;
use clap::Parser;
use pdfclean::CleanOptions;

use crate::prelude::println;
use crate::prelude::*;

mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    name = "pdfclean",
    author,
    version,
    about = "Reflow noisy PDFs into clean, fixed-layout documents"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Rebuild a PDF as a clean single-column document
    Clean {
        /// Path to the PDF file
        path: std::path::PathBuf,
        /// Output file (defaults to <input>.clean.pdf)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Output page width in points
        #[arg(long, default_value_t = 612.0)]
        page_width: f32,
        /// Output page height in points
        #[arg(long, default_value_t = 792.0)]
        page_height: f32,
        /// Margin on all four sides, in points
        #[arg(long, default_value_t = 50.0)]
        margin: f32,
        /// Body font size in points
        #[arg(long, default_value_t = 11.0)]
        font_size: f32,
        /// Print the cleaned text to stdout instead of writing a file
        #[arg(long)]
        text: bool,
        /// Print a JSON envelope (base64 PDF, text, source page count)
        #[arg(long)]
        json: bool,
    },
    /// Print extracted text in reading order, pages separated by blank lines
    Text {
        /// Path to the PDF file
        path: std::path::PathBuf,
    },
    /// Print page count and document metadata
    Info {
        /// Path to the PDF file
        path: std::path::PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        Commands::Clean {
            path,
            output,
            page_width,
            page_height,
            margin,
            font_size,
            text,
            json,
        } => {
            let bytes = std::fs::read(&path)?;
            let opts = CleanOptions {
                page_width,
                page_height,
                margin,
                font_size,
            };
            let cleaned = pdfclean::clean_with_options(&bytes, &opts).map_err(|e| eyre!(e))?;

            if json {
                let envelope = serde_json::json!({
                    "pdf": base64::engine::general_purpose::STANDARD.encode(&cleaned.pdf),
                    "text": cleaned.text,
                    "pageCount": cleaned.page_count,
                });
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else if text {
                println!("{}", cleaned.text);
            } else {
                let out = output.unwrap_or_else(|| path.with_extension("clean.pdf"));
                std::fs::write(&out, &cleaned.pdf)?;
                println!(
                    "wrote {} ({} source pages)",
                    out.display(),
                    cleaned.page_count
                );
            }
            Ok(())
        }
        Commands::Text { path } => {
            let bytes = std::fs::read(&path)?;
            let pages = pdfclean::extract_text(&bytes).map_err(|e| eyre!(e))?;
            println!("{}", pages.join("\n\n"));
            Ok(())
        }
        Commands::Info { path } => {
            let bytes = std::fs::read(&path)?;
            let info = pdfclean::info(&bytes).map_err(|e| eyre!(e))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
    }
}
