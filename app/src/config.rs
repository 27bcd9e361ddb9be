use api_client::DEFAULT_BACKEND_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub backend_url: String,
    pub previews_dir: PathBuf,
    pub cache_path: PathBuf,
    pub grid_size_per_directory: bool,
    pub debug_console: bool,
    pub trace_spans: bool,
}

#[derive(Default)]
pub struct AppConfigOverrides {
    pub log_level: Option<String>,
    pub backend_url: Option<String>,
    pub previews_dir: Option<PathBuf>,
    pub grid_size_per_directory: bool,
    pub debug_console: bool,
    pub trace_spans: bool,
}

fn base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lightbox")
}

fn default_config_path() -> PathBuf {
    base_dir().join("config")
}

/// Where the backend writes generated previews and face crops.
fn default_previews_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(base_dir)
        .join("lightbox")
}

impl AppConfig {
    pub fn load_from(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(default_config_path);
        let cfg = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()
            .unwrap_or_default();

        let log_level = cfg
            .get_string("log_level")
            .unwrap_or_else(|_| "info".to_string());
        let backend_url = cfg
            .get_string("backend_url")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let previews_dir = cfg
            .get_string("previews_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_previews_dir());
        let cache_path = cfg
            .get_string("cache_path")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir());
        let grid_size_per_directory = cfg.get_bool("grid_size_per_directory").unwrap_or(false);
        let debug_console = cfg.get_bool("debug_console").unwrap_or(false);
        let trace_spans = cfg.get_bool("trace_spans").unwrap_or(false);

        Self {
            log_level,
            backend_url,
            previews_dir,
            cache_path,
            grid_size_per_directory,
            debug_console,
            trace_spans,
        }
    }

    pub fn apply_overrides(mut self, ov: &AppConfigOverrides) -> Self {
        if let Some(l) = &ov.log_level {
            self.log_level = l.clone();
        }
        if let Some(url) = &ov.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(dir) = &ov.previews_dir {
            self.previews_dir = dir.clone();
        }
        if ov.grid_size_per_directory {
            self.grid_size_per_directory = true;
        }
        if ov.debug_console {
            self.debug_console = true;
        }
        if ov.trace_spans {
            self.trace_spans = true;
        }
        self
    }

    pub fn save_to(&self, path: Option<PathBuf>) -> std::io::Result<()> {
        let path = path.unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = toml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, data)
    }
}
