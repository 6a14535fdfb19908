//! Numeral Order - alphabetical vs. counting order of number words
//!
//! CLI commands:
//! - gui: Native viewer
//! - render: Write one frame as SVG
//! - ranks: Print a language's alphabetical ranking
//! - list: List languages, presets and the palette

mod color;
mod config;
mod draw;
mod grid;
mod gui;
mod layout;
mod loader;
mod logging;
mod palette;
mod rank;
mod scene;
mod svg;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "numeral_order")]
#[command(about = "Compare how number words sort alphabetically across languages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to numeral_order.yaml config
    #[arg(short, long, default_value = "numeral_order.yaml")]
    config: PathBuf,

    /// Debug-level console logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch native GUI viewer
    Gui {
        /// Preset to start with
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Render one frame to an SVG file
    Render {
        /// Preset to render (defaults to the configured one)
        #[arg(short, long)]
        preset: Option<String>,

        /// Draw labels
        #[arg(long)]
        labels: bool,

        /// Draw the backdrop dot lattice
        #[arg(long)]
        dots: bool,

        /// Output file
        #[arg(short, long, default_value = "numeral_order.svg")]
        output: PathBuf,
    },

    /// Print the alphabetical ranking of a language
    Ranks {
        /// Language code, e.g. "english"
        #[arg(short, long)]
        language: String,
    },

    /// List languages, presets and the palette
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env = config::Env::load();
    let _log_guard = logging::init_logging(&env.log_dir, cli.verbose);
    tracing::debug!("Numeral Order starting up, config={:?}", cli.config);

    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        config::Config::default()
    }
    .with_env(&env);
    tracing::info!(
        "Config loaded: {} languages, {} presets, data from {}",
        config.languages.len(),
        config.presets.len(),
        config.data_source
    );

    match cli.command {
        Commands::Gui { preset } => {
            tracing::info!("Launching native GUI viewer");
            gui::run_viewer(config, preset)?;
        }

        Commands::Render { preset, labels, dots, output } => {
            render(&config, preset.as_deref(), labels, dots, &output).await?;
        }

        Commands::Ranks { language } => {
            print_ranks(&config, &language).await?;
        }

        Commands::List => {
            list(&config)?;
        }
    }

    Ok(())
}

/// Render a single static frame to SVG
async fn render(
    config: &config::Config,
    preset: Option<&str>,
    labels: bool,
    dots: bool,
    output: &PathBuf,
) -> anyhow::Result<()> {
    let mut state = scene::initialize(config)?;
    if let Some(name) = preset {
        state.select_preset(name)?;
    }
    state.set_show_labels(labels);
    state.set_show_dots(dots);

    let languages: Vec<String> = state.preset().languages().cloned().collect();
    let source = loader::DataSource::parse(&config.data_source);
    state.attach(loader::load_all(&source, &languages).await);

    let frame = scene::render_frame(&mut state, &[]);
    let (width, height) = state.size();
    svg::write_svg(&frame.commands, width, height, output)?;
    println!(
        "Rendered preset '{}' ({} draw commands) to {}",
        state.preset().name,
        frame.commands.len(),
        output.display()
    );
    Ok(())
}

/// Print the ranking table of one language
async fn print_ranks(config: &config::Config, language: &str) -> anyhow::Result<()> {
    let lang = config
        .get_language(language)
        .ok_or_else(|| anyhow::anyhow!("Language not found: {}", language))?;

    let source = loader::DataSource::parse(&config.data_source);
    let words = loader::fetch_number_list(&source, &lang.code).await?;
    let collator = rank::LocaleCollator::new(&lang.locale)?;
    let ranked = rank::compute_ranks(&words, &collator)?;

    println!("{} ({}), {} words:", lang.code, collator.locale(), ranked.len());
    println!();
    println!("  {:>5}  {:>6}  word", "rank", "number");

    let mut in_place = 0;
    for entry in &ranked {
        let marker = if entry.numeric_index == entry.alphabetical_rank {
            in_place += 1;
            " *"
        } else {
            ""
        };
        println!(
            "  {:>5}  {:>6}  {}{}",
            entry.alphabetical_rank,
            entry.numeric_index + 1,
            entry.label,
            marker
        );
    }

    println!();
    println!("{} of {} words (*) sort into their counting position", in_place, ranked.len());
    Ok(())
}

/// List languages, presets and the palette
fn list(config: &config::Config) -> anyhow::Result<()> {
    println!("Languages ({}):", config.languages.len());
    for lang in &config.languages {
        println!("  - {} [{}]", lang.code, lang.locale);
    }

    println!();
    println!("Presets ({}):", config.presets.len());
    for preset in &config.presets {
        let marker = if preset.name == config.default_preset { " (default)" } else { "" };
        println!("## {}{}", preset.name, marker);
        for (quadrant, langs) in &preset.quadrants {
            println!("  {}: {}", quadrant, langs.join(", "));
        }
    }

    let palette = palette::build_palette(&config.palette.base_colors, config.palette.shades)?;
    println!();
    println!("Palette ({} colors, in binding order):", palette.len());
    for chunk in palette.hex_colors().chunks(config.palette.base_colors.len().max(1)) {
        println!("  {}", chunk.join(" "));
    }
    Ok(())
}
