use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cut_release::cli::orchestration::{self, ReleaseArgs};
use cut_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "cut-release",
    version,
    about = "Bump version strings, tag, publish and build a library release"
)]
struct Args {
    #[arg(long, help = "Version string to replace")]
    old: Option<String>,

    #[arg(long, help = "Version string to release")]
    new: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Repository working copy to release from"
    )]
    repo: PathBuf,

    #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Stop on the first failed git or external command")]
    strict: bool,

    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,
}

impl From<Args> for ReleaseArgs {
    fn from(args: Args) -> Self {
        ReleaseArgs {
            old: args.old,
            new: args.new,
            config_path: args.config,
            repo_path: args.repo,
            force: args.force,
            dry_run: args.dry_run,
            strict: args.strict,
        }
    }
}

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("cut_release")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logger(args.debug)?;

    if let Err(e) = orchestration::run_release_workflow(&args.into()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
