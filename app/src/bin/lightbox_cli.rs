use api_client::{ApiClient, PreviewEvent};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[path = "../config.rs"]
mod config;
#[path = "../logging.rs"]
mod logging;

#[derive(Parser)]
#[command(
    name = "lightbox_cli",
    author,
    version,
    about = "Lightbox command-line client"
)]
struct Cli {
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Override the backend address
    #[arg(long)]
    backend_url: Option<String>,
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List imported folders
    Folders,
    /// Import a folder
    AddFolder {
        /// Absolute path of the folder
        path: String,
    },
    /// Stop tracking a folder
    DeleteFolder {
        /// Path of the folder as shown by `folders`
        path: String,
    },
    /// List the photos of a folder
    Photos {
        /// Path of the folder
        path: String,
        /// Only show photos carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show face clusters, largest first
    Faces {
        /// Restrict to these folder paths (repeatable)
        #[arg(long = "dir")]
        dirs: Vec<String>,
    },
    /// Show camera metadata for photos
    Metadata {
        /// Photo ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print preview generation events until the stream closes
    Watch,
}

#[cfg_attr(feature = "trace-spans", tracing::instrument)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = config::AppConfigOverrides {
        log_level: cli.log_level.clone(),
        backend_url: cli.backend_url.clone(),
        ..Default::default()
    };
    let cfg = config::AppConfig::load_from(cli.config.clone()).apply_overrides(&overrides);
    let _guard = logging::init(&cfg, "lightbox_cli.log")?;

    let client = ApiClient::with_base_url(cfg.backend_url.clone());

    match cli.command {
        Commands::Folders => {
            let folders = client.get_folders().await?;
            if folders.is_empty() {
                println!("No folders imported");
            }
            for folder in folders {
                let state = if folder.is_imported { "" } else { ", importing" };
                println!(
                    "{} (id: {}, {} photos{})",
                    folder.path, folder.id, folder.photo_count, state
                );
            }
        }
        Commands::AddFolder { path } => {
            let folder = client.add_folder(&path).await?;
            println!("Folder added: {} (id: {})", folder.path, folder.id);
        }
        Commands::DeleteFolder { path } => {
            client.delete_folder(&path).await?;
            println!("Folder removed: {}", path);
        }
        Commands::Photos { path, tags } => {
            let data = client.get_photos_from_path(&path, &tags).await?;
            for photo in &data.photos {
                println!("{} - {}", photo.id, photo.name);
            }
            println!("{} photos", data.photos.len());
            if !data.tags.is_empty() {
                let shown: Vec<String> = data.tags.iter().map(|t| ui::tags::capitalize(t)).collect();
                println!("Tags: {}", shown.join(", "));
            }
        }
        Commands::Faces { dirs } => {
            let filter = (!dirs.is_empty()).then_some(dirs.as_slice());
            let clusters = client.get_face_clusters(filter).await?;
            if clusters.is_empty() {
                println!("No faces found");
            }
            for dir in ui::faces::sort_clusters(&clusters) {
                println!("{}: {} faces", dir.directory, ui::faces::total_faces(&dir));
                for cluster in &dir.clusters {
                    println!("  {} ({}): {}", cluster.id, cluster.faces.len(), cluster.faces.join(", "));
                }
            }
        }
        Commands::Metadata { ids } => {
            let summaries = client.get_basic_metadata(&ids).await?;
            for summary in &summaries {
                println!("{}", summary.id);
                for line in ui::summary::summary_lines(summary) {
                    println!("  {}", line);
                }
            }
        }
        Commands::Watch => {
            let mut events = client.subscribe_events().await?;
            while let Some(event) = events.recv().await {
                match event {
                    PreviewEvent::Start => println!("Preview generation started"),
                    PreviewEvent::Progress(p) => println!("Progress: {:.0}%", p),
                    PreviewEvent::End => println!("Preview generation finished"),
                }
            }
            println!("Event stream closed");
        }
    }

    Ok(())
}
