use adsynth::cli::{Cli, Commands};
use adsynth::output::Printer;
use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.global.verbose > 0 {
        EnvFilter::new(cli.global.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.global.log_filter()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let printer = Printer::new();
    let global = &cli.global;

    match cli.command {
        Commands::Palette(args) => adsynth::cli::palette::run(args, global, &printer)?,
        Commands::Crop(args) => adsynth::cli::crop::run(args, global, &printer)?,
        Commands::Compose(args) => adsynth::cli::compose::run(args, global, &printer)?,
        Commands::Templates(args) => adsynth::cli::templates::run(args, global, &printer)?,
        Commands::Init(args) => adsynth::cli::init::run(args, &printer)?,
        Commands::Completions(args) => adsynth::cli::completions::run(args)?,
    }

    Ok(())
}
