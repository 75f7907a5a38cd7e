use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use qr_pro_renderer::{
    Color, Configurable, Generation, History, JsonFileStore, LogoShape, ModuleShape, QrStudio,
    StyleProfile, download,
};

#[derive(Parser)]
#[command(name = "qr-pro")]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "Render styled QR codes and manage saved codes", long_about = None)]
struct Cli {
    /// JSON file holding the saved-code history.
    #[arg(long, global = true, default_value = "qr-pro-history.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a code and write it as PNG.
    Generate(GenerateArgs),

    /// Inspect or edit saved codes.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args)]
struct GenerateArgs {
    /// Text or URL to encode.
    content: String,

    /// Style profile JSON file. Flags below override its values.
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long, value_enum)]
    outer_eye: Option<ModuleShape>,

    #[arg(long, value_enum)]
    inner_eye: Option<ModuleShape>,

    #[arg(long, value_enum)]
    body: Option<ModuleShape>,

    /// Module color as hex, e.g. "#1a2b3c".
    #[arg(long)]
    foreground: Option<String>,

    /// Background color as hex.
    #[arg(long)]
    background: Option<String>,

    /// Output side length in pixels.
    #[arg(long)]
    resolution: Option<u32>,

    /// Image to composite at the center.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo side relative to the image side.
    #[arg(long)]
    logo_size: Option<f32>,

    #[arg(long, value_enum)]
    logo_shape: Option<LogoShape>,

    /// Clear the logo's background color before compositing.
    /// `--remove-background=false` turns off a profile's setting.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    remove_background: Option<bool>,

    /// Directory the PNG is written to.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Do not record the code in history.
    #[arg(long)]
    no_save: bool,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Print saved codes, newest first.
    List,
    /// Delete every saved code with this content.
    Remove { content: String },
    /// Delete all saved codes.
    Clear,
}

fn load_profile(args: &GenerateArgs) -> Result<StyleProfile> {
    let mut profile = match &args.profile {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            StyleProfile::from_json(&json)?
        }
        None => StyleProfile::new(),
    };
    apply_overrides(&mut profile, args)?;
    Ok(profile)
}

/// Lets command-line flags win over profile values.
fn apply_overrides(profile: &mut StyleProfile, args: &GenerateArgs) -> Result<()> {
    let render = &mut profile.render;
    if let Some(shape) = args.outer_eye {
        render.outer_eye = shape;
    }
    if let Some(shape) = args.inner_eye {
        render.inner_eye = shape;
    }
    if let Some(shape) = args.body {
        render.body = shape;
    }
    if let Some(hex) = &args.foreground {
        render.foreground = hex.parse::<Color>()?;
    }
    if let Some(hex) = &args.background {
        render.background = hex.parse::<Color>()?;
    }
    if let Some(resolution) = args.resolution {
        render.resolution = resolution;
    }

    let logo = profile.logo.get_or_insert_with(Default::default);
    if let Some(size) = args.logo_size {
        logo.size_fraction = size;
    }
    if let Some(shape) = args.logo_shape {
        logo.shape = shape;
    }
    if let Some(remove) = args.remove_background {
        logo.remove_background = remove;
    }

    Ok(())
}

fn generate(store: JsonFileStore, args: GenerateArgs) -> Result<()> {
    let mut studio = QrStudio::new(store);
    studio.apply_profile(&load_profile(&args)?);

    if let Some(path) = &args.logo {
        let bytes = fs::read(path).with_context(|| format!("reading logo {}", path.display()))?;
        studio.load_logo(&bytes)?;
    }

    match studio.generate(&args.content, !args.no_save)? {
        Generation::Placeholder => bail!("nothing to encode"),
        Generation::Failed => bail!("could not render {:?}", args.content),
        Generation::Rendered => {}
    }

    let Some(surface) = studio.surface() else {
        bail!("no image was produced");
    };
    let path = download(surface, &args.out)?;
    println!("{}", path.display());
    Ok(())
}

fn history(store: JsonFileStore, command: HistoryCommand) -> Result<()> {
    let mut history = History::new(store);
    match command {
        HistoryCommand::List => {
            for entry in history.entries()? {
                println!("{}\t{}\t{}", entry.date, entry.kind, entry.content);
            }
        }
        HistoryCommand::Remove { content } => {
            let removed = history.remove(&content)?;
            info!("Removed {removed} entries");
        }
        HistoryCommand::Clear => history.clear()?,
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(cli.store);
    match cli.command {
        Command::Generate(args) => generate(store, args),
        Command::History(command) => history(store, command),
    }
}
