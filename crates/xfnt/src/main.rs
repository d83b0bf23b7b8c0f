use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use flexi_logger::Logger;
use xerox_font::{Font, bdf, dump, parse_hex_color};

const DEFAULT_SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

#[derive(Parser)]
#[command(version, about = "Inspects and converts Xerox raster printer fonts.")]
pub struct Cli {
    #[arg(help = "Log debug output to stderr.", short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Converts a font to BDF")]
    Bdf {
        #[arg(help = "Font file to convert.")]
        input: PathBuf,

        #[arg(help = "BDF file to write, stdout if omitted.")]
        output: Option<PathBuf>,

        #[arg(help = "Point size written to the SIZE line.", long, default_value_t = bdf::DEFAULT_POINT_SIZE)]
        point_size: u32,
    },

    #[command(about = "Dumps metadata, glyph images and sample text of a font")]
    Dump(DumpArgs),
}

#[derive(Args)]
struct DumpArgs {
    #[arg(help = "Font file to inspect.")]
    input: PathBuf,

    #[arg(help = "Write metadata to this file (.json or .txt).", short, long)]
    metadata: Option<PathBuf>,

    #[arg(help = "Write one PNG per glyph into this directory.", short = 'd', long)]
    image_dir: Option<PathBuf>,

    #[arg(help = "Text of the rendered sample.", long, conflicts_with = "sample_text_file")]
    sample_text: Option<String>,

    #[arg(help = "Read the sample text from a file.", long)]
    sample_text_file: Option<PathBuf>,

    #[arg(help = "Render a text sample to this PNG file.", long)]
    sample_output: Option<PathBuf>,

    #[arg(help = "Ink color of the sample, #RRGGBB or #RRGGBBAA.", long, default_value = "#000000")]
    ink: String,

    #[arg(help = "Print every glyph as binary rows.", long, default_value_t = false)]
    glyphs: bool,

    #[arg(help = "Print the header and metadata layout report.", long, default_value_t = false)]
    report: bool,

    #[arg(help = "Print the character width table.", long, default_value_t = false)]
    widths: bool,

    #[arg(help = "Leave spacing characters out of the layout report.", long, default_value_t = false)]
    ignore_spaces: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;

    match args.command {
        Commands::Bdf { input, output, point_size } => convert_bdf(&input, output.as_deref(), point_size),
        Commands::Dump(dump_args) => run_dump(&dump_args),
    }
}

fn load(path: &Path) -> anyhow::Result<Font> {
    Font::load_file(path).with_context(|| format!("loading {}", path.display()))
}

fn convert_bdf(input: &Path, output: Option<&Path>, point_size: u32) -> anyhow::Result<()> {
    let font = load(input)?;
    if font.glyph_count() == 0 {
        bail!("{} contains no characters to export", input.display());
    }

    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);
            bdf::write_bdf(&font, point_size, &mut out)?;
            out.flush()?;
            log::info!("wrote {} glyphs to {}", font.glyph_count(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            bdf::write_bdf(&font, point_size, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn run_dump(args: &DumpArgs) -> anyhow::Result<()> {
    let font = load(&args.input)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.report {
        dump::write_layout_report(&font, &mut out, args.ignore_spaces)?;
    }
    if args.widths {
        dump::write_width_table(&font, &mut out)?;
    }
    if args.glyphs {
        dump::write_glyph_ascii(&font, &mut out)?;
    }
    out.flush()?;

    if let Some(path) = &args.metadata {
        dump::write_metadata(&font, path)?;
        log::info!("wrote metadata to {}", path.display());
    }

    if let Some(dir) = &args.image_dir {
        let count = dump::save_glyph_images(&font, dir)?;
        log::info!("wrote {count} glyph images to {}", dir.display());
    }

    if let Some(path) = &args.sample_output {
        let text = match &args.sample_text_file {
            Some(file) => fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?,
            None => args.sample_text.clone().unwrap_or_else(|| DEFAULT_SAMPLE_TEXT.to_string()),
        };
        let ink = parse_hex_color(&args.ink)?;
        let img = font.render(ink, text.trim_end_matches(['\r', '\n']));
        if img.width() == 0 || img.height() == 0 {
            bail!("sample text renders to an empty image");
        }
        dump::save_png(&img, path)?;
        log::info!("wrote {}x{} sample to {}", img.width(), img.height(), path.display());
    }

    Ok(())
}
