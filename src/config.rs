use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub renderer: RendererConfig,
    pub narration: NarrationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RendererConfig {
    pub binary: String,
    pub quality: String, // "low", "medium" or "high"
}

#[derive(Debug, Deserialize, Clone)]
pub struct NarrationConfig {
    pub binary: String,
    pub lang: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            binary: "manim".to_string(),
            quality: "medium".to_string(),
        }
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            binary: "gtts-cli".to_string(),
            lang: "en".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            renderer: RendererConfig::default(),
            narration: NarrationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("renderer.binary", "manim")?
            .set_default("renderer.quality", "medium")?
            .set_default("narration.binary", "gtts-cli")?
            .set_default("narration.lang", "en")?
            .set_default("output.dir", "output")?
            // Load from file if exists
            .add_source(config::File::with_name("lantern").required(false))
            // Allow env var overrides (e.g. LANTERN_RENDERER__BINARY=manimgl)
            .add_source(config::Environment::with_prefix("LANTERN").separator("__"));

        builder.build()?.try_deserialize()
    }
}
