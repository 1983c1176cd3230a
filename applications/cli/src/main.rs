/// Lectern - lecture library and player
use clap::{Args, Parser, Subcommand};
use lectern_cli::commands::{catalog, library, session};
use lectern_cli::{AppConfig, Context};
use lectern_core::{QueryState, Section, SortKey};
use lectern_library::NewLecture;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Browse, bookmark and resume recorded lectures", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./lectern.toml if present)
    #[arg(short, long, global = true, env = "LECTERN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List lectures
    List {
        /// all, recent, favorites or continue
        #[arg(short = 'S', long, default_value = "all", value_parser = parse_section)]
        section: Section,
        /// Case-insensitive search term
        #[arg(short, long, default_value = "")]
        search: String,
        /// date, title, instructor or duration
        #[arg(short = 'o', long, default_value = "date", value_parser = parse_sort)]
        sort: SortKey,
    },
    /// Add a lecture to a catalog file
    Add(AddArgs),
    /// Merge lectures from another catalog file
    Import {
        /// Catalog document to import
        from: PathBuf,
        /// Catalog file to update (default: the configured source)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Export a catalog file for sharing
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Catalog file to export (default: the configured source)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Toggle a lecture's favorite flag
    Favorite {
        /// Lecture id
        id: String,
    },
    /// Show recently played lectures
    History {
        /// Maximum number of lectures to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Resume the last session if it is recent
    Resume,
    /// Show or set the color theme (light, dark, toggle)
    Theme {
        value: Option<String>,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(short, long)]
    title: String,
    #[arg(short, long, default_value = "")]
    instructor: String,
    #[arg(long, default_value = "")]
    course: String,
    /// Defaults to today
    #[arg(long)]
    date: Option<String>,
    #[arg(short, long, default_value = "")]
    description: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long)]
    based_on: Option<String>,
    #[arg(long)]
    key: Option<String>,
    #[arg(long)]
    video_link: Option<String>,
    /// Audio file name the lecture's filename is derived from
    #[arg(long)]
    file: Option<String>,
    /// Remote audio URL, used when there is no local file
    #[arg(long)]
    audio_url: Option<String>,
    /// Catalog file to update (default: the configured source)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

impl AddArgs {
    fn into_parts(self) -> (NewLecture, Option<PathBuf>) {
        let new = NewLecture {
            title: self.title,
            instructor: self.instructor,
            course: self.course,
            date: self.date,
            description: self.description,
            tags: self.tags,
            based_on: self.based_on,
            key: self.key,
            video_link: self.video_link,
            source_file: self.file,
            audio_url: self.audio_url,
        };
        (new, self.catalog)
    }
}

fn parse_section(s: &str) -> Result<Section, String> {
    Section::from_str(&s.to_lowercase()).ok_or_else(|| format!("unknown section '{s}'"))
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    SortKey::from_str(&s.to_lowercase()).ok_or_else(|| format!("unknown sort key '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lectern=info,lectern_library=info,lectern_playback=info,lectern_storage=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref(), None)?;
    config.validate()?;

    match cli.command {
        Commands::List {
            section,
            search,
            sort,
        } => {
            let ctx = Context::open(config).await?;
            library::list(&ctx, &QueryState::new(section, search, sort)).await?;
        }
        Commands::Add(args) => {
            let (new, explicit) = args.into_parts();
            let path = catalog::resolve_catalog_path(&config, explicit)?;
            catalog::add(&path, new).await?;
        }
        Commands::Import { from, catalog: explicit } => {
            let path = catalog::resolve_catalog_path(&config, explicit)?;
            catalog::import(&path, &from).await?;
        }
        Commands::Export { output, catalog: explicit } => {
            let path = catalog::resolve_catalog_path(&config, explicit)?;
            catalog::export(&path, output.as_deref()).await?;
        }
        Commands::Favorite { id } => {
            let ctx = Context::open(config).await?;
            library::favorite(&ctx, &id).await?;
        }
        Commands::History { limit } => {
            let ctx = Context::open(config).await?;
            library::history(&ctx, limit).await?;
        }
        Commands::Resume => {
            let ctx = Context::open(config).await?;
            session::resume(&ctx).await?;
        }
        Commands::Theme { value } => {
            let ctx = Context::open(config).await?;
            session::theme(&ctx, value.as_deref()).await?;
        }
    }

    Ok(())
}
