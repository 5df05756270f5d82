use clap::{Args, Parser, Subcommand};
use karyoplot::file::{FileError, OutputFile};
use karyoplot::plot::PageLayout;
use karyoplot::{write_svg, Dataset, DatasetError, PlotStyle, RenderError};
use log::info;
use std::io;
use std::io::Write;
use thiserror::Error;

const INFO: &str = "\
karyoplot: draw chromosomes centred on their centromeres
usage: karyoplot [--help] <subcommand>

Subcommands:

  draw:   render every species in a centromere table to SVG.
  scales: write the per-species scales and drawn arm lengths as TSV.

";

#[derive(Parser)]
#[clap(name = "karyoplot")]
#[clap(about = INFO)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Page geometry shared by all subcommands.
#[derive(Args)]
struct PageArgs {
    /// the page width in pixels; chromosomes are centred at half this width
    #[arg(long, default_value_t = 1200.0)]
    width: f64,
    /// space in pixels kept free past the longest arm of each species
    #[arg(long, default_value_t = 50.0)]
    margin: f64,
    /// vertical space in pixels per chromosome
    #[arg(long, default_value_t = 30.0)]
    row_height: f64,
}

impl PageArgs {
    fn style(&self) -> PlotStyle {
        PlotStyle {
            width: self.width,
            margin: self.margin,
            row_height: self.row_height,
            ..PlotStyle::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw each species' chromosomes as bars split at their centromeres.
    ///
    /// The input is a TSV with a header naming the columns `species`,
    /// `chromosome`, `chromosome length (bp)`, `centromeric region start`
    /// and `centromeric region end`. It may be gzip-compressed.
    ///
    /// Example:
    ///
    ///  $ karyoplot draw --output chromosomes.svg centromeric-regions.tsv
    Draw {
        /// the output SVG path (a `.gz` extension compresses it)
        #[arg(long, short, required = true)]
        output: String,
        /// the centromere table
        #[arg(required = true)]
        table: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Write the layout as TSV instead of drawing it.
    ///
    /// This will output a TSV with the following columns:
    ///
    ///  - species name
    ///  - chromosome name
    ///  - chromosome length                     (bp)
    ///  - centromere position                   (bp, midpoint of its region)
    ///  - species scale                         (pixels per bp)
    ///  - left arm length                       (pixels)
    ///  - right arm length                      (pixels)
    Scales {
        /// the output file path (if not set, uses standard out)
        #[arg(long, short)]
        output: Option<String>,
        /// the centromere table
        #[arg(required = true)]
        table: String,
        /// Include a header
        #[arg(long, default_value_t = false)]
        header: bool,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Dataset(#[from] DatasetError),
    #[error("{0}")]
    Render(#[from] RenderError),
    #[error("{0}")]
    File(#[from] FileError),
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
}

fn report_skipped(page: &PageLayout) {
    for skipped in &page.skipped {
        eprintln!("Warning: species '{}' not drawn: {}", skipped.name, skipped.reason);
    }
}

fn draw(table: &str, output: &str, style: &PlotStyle) -> Result<(), CliError> {
    let dataset = Dataset::from_tsv(table)?;
    let page = PageLayout::plan(&dataset, style);
    report_skipped(&page);
    write_svg(&page, style, output)?;
    Ok(())
}

fn write_scales(
    table: &str,
    output: Option<&str>,
    header: bool,
    style: &PlotStyle,
) -> Result<(), CliError> {
    let dataset = Dataset::from_tsv(table)?;
    let page = PageLayout::plan(&dataset, style);
    report_skipped(&page);

    // open writer, possibly to stdout
    let mut writer: Box<dyn Write> = if let Some(filepath) = output {
        OutputFile::new(filepath, None).writer()?
    } else {
        Box::new(io::stdout())
    };

    page.write_scales(&mut writer, header)?;
    writer.flush()?;
    info!("wrote scales for {} species", page.species.len());
    Ok(())
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match &cli.command {
        Some(Commands::Draw {
            output,
            table,
            page,
        }) => draw(table, output, &page.style()),
        Some(Commands::Scales {
            output,
            table,
            header,
            page,
        }) => write_scales(table, output.as_deref(), *header, &page.style()),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
