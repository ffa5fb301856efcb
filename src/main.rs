use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use theorem_lantern::config::AppConfig;
use theorem_lantern::content::{Category, ContentRecord};
use theorem_lantern::server;
use theorem_lantern::{ManimRenderer, NarrationEngine, SceneTemplates};

#[derive(Parser)]
#[command(name = "theorem-lantern")]
#[command(about = "Math Explainer Video Service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service (the default when no command is given)
    Serve {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render a content record from a JSON file, without going through HTTP
    Render {
        /// Path to the content record JSON
        #[arg(value_name = "CONTENT")]
        content: String,

        /// Directory for the published artifacts
        #[arg(long)]
        output: Option<String>,
    },
    /// Print a sample content record for a category
    Sample {
        #[arg(value_enum)]
        category: Category,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Sample { category }) => {
            let record = ContentRecord::sample(category);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Some(Commands::Render { content, output }) => {
            let mut config = load_config();
            if let Some(dir) = output {
                config.output.dir = dir.into();
            }
            run_render(&config, Path::new(&content))
        }
        Some(Commands::Serve { host, port }) => {
            let mut config = load_config();
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_serve(config)
        }
        None => run_serve(load_config()),
    }
}

fn load_config() -> AppConfig {
    AppConfig::load().unwrap_or_else(|e| {
        eprintln!("⚠️  Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    })
}

fn run_serve(config: AppConfig) -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("🎬 Math Explainer Video Service\n");
    print_engine_hints(&config);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(config))
}

fn print_engine_hints(config: &AppConfig) {
    if !ManimRenderer::is_available(&config.renderer.binary) {
        println!(
            "⚠️  Renderer '{}' not found. /generate will fail until it is installed:",
            config.renderer.binary
        );
        println!("   pip install manim\n");
    }

    let narration = NarrationEngine::new(&config.narration);
    if !narration.is_available() {
        println!(
            "⚠️  Speech engine '{}' not found. /generate will fail until it is installed:",
            config.narration.binary
        );
        println!("   pip install gTTS\n");
    }
}

fn run_render(config: &AppConfig, content_path: &Path) -> Result<()> {
    println!("🎬 Math Explainer Video Engine\n");

    let raw = std::fs::read_to_string(content_path)
        .with_context(|| format!("Failed to read content file: {}", content_path.display()))?;
    let content: ContentRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse content file: {}", content_path.display()))?;

    println!("📋 Content Summary:");
    println!("{}", content.summarize());

    let scene = SceneTemplates::build(&content);
    println!("🎞️  Scene '{}': {} ops\n", scene.name, scene.len());

    // Offline renders narrate the explanation, falling back to the topic
    let narration_text = if content.explanation.is_empty() {
        content.topic.clone()
    } else {
        content.explanation.clone()
    };

    let response = server::render_and_publish(config, &content, &narration_text)?;

    println!("\n✨ Done");
    println!("   Video: {}", response.video_path);
    println!("   Audio: {}", response.audio_path);
    Ok(())
}
