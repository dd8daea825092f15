use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use livemark::config::{self, OverlaySettings};
use livemark::diagram::{DiagramCache, DiagramPipeline, HttpDiagramRenderer};
use livemark::handlers::table::table_to_html;
use livemark::{
    Document, Effect, EditorState, MarkdownParser, OverlayCaches, OverlayEngine, OverlayResult,
    Selection, StateEffect, Transaction,
};

/// Live-preview decorations for markdown, computed outside an editor
#[derive(Parser)]
#[command(name = "livemark")]
#[command(version)]
#[command(about = "Compute live-preview decorations for a markdown document")]
struct Cli {
    /// Settings file to use instead of the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decorations for a file
    Decorate {
        file: PathBuf,

        /// Caret offset; decorations under it stay raw
        #[arg(long)]
        cursor: Option<usize>,

        /// Start of the visible range (default: whole document)
        #[arg(long, requires = "to")]
        from: Option<usize>,

        /// End of the visible range
        #[arg(long, requires = "from")]
        to: Option<usize>,

        /// Print the decoration set as JSON instead of the projected text
        #[arg(long)]
        json: bool,

        /// Render diagram blocks through the configured endpoint before printing
        #[arg(long)]
        fetch: bool,
    },
    /// Print the HTML for the first pipe table in a file
    Table { file: PathBuf },
    /// Print the user config path
    ConfigPath,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decorate {
            file,
            cursor,
            from,
            to,
            json,
            fetch,
        } => match settings(cli.config.as_deref()) {
            Ok(settings) => {
                let viewport = from.zip(to).map(|(from, to)| from..to);
                decorate(&file, settings, cursor, viewport, json, fetch).await
            }
            Err(e) => Err(e),
        },
        Commands::Table { file } => table(&file),
        Commands::ConfigPath => match config::user_config_path() {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => {
                eprintln!("Error: Could not determine a config directory.");
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn settings(path: Option<&Path>) -> OverlayResult<OverlaySettings> {
    match path {
        Some(path) => {
            config::load_layered_settings(config::user_config_path().as_deref(), path)
        }
        None => Ok(config::load_user_settings()),
    }
}

async fn decorate(
    file: &Path,
    settings: OverlaySettings,
    cursor: Option<usize>,
    viewport: Option<std::ops::Range<usize>>,
    json: bool,
    fetch: bool,
) -> OverlayResult<()> {
    let text = tokio::fs::read_to_string(file).await?;
    let mut parser = MarkdownParser::new()?;
    let tree = parser.parse(&text);
    let doc = Document::new(text);
    let viewport = viewport.unwrap_or(0..doc.len());
    let selection = cursor.map_or_else(Selection::none, Selection::cursor);

    let caches = OverlayCaches::default();
    let endpoint = settings.diagram.endpoint.clone();
    let mut engine = OverlayEngine::new(settings, caches.clone());
    let (mut state, effects) = engine.create_state(doc, tree, selection, vec![viewport]);

    if fetch {
        state = fetch_diagrams(&mut engine, state, effects, &endpoint, caches.diagrams).await?;
    }

    if json {
        let rendered = serde_json::to_string_pretty(state.decorations())
            .map_err(|e| livemark::OverlayError::Internal(e.to_string()))?;
        println!("{}", rendered);
    } else {
        print!("{}", state.decorations().project(state.doc().text()));
    }
    Ok(())
}

/// Run every requested fetch and fold the deliveries back into the state.
async fn fetch_diagrams(
    engine: &mut OverlayEngine,
    mut state: EditorState,
    effects: Vec<Effect>,
    endpoint: &str,
    cache: DiagramCache,
) -> OverlayResult<EditorState> {
    let renderer = HttpDiagramRenderer::new(endpoint)?;
    let (pipeline, mut deliveries) = DiagramPipeline::new(renderer, cache);

    let mut pending = 0;
    for effect in effects {
        if let Effect::FetchDiagram(request) = effect
            && pipeline.request(request)
        {
            pending += 1;
        }
    }

    while pending > 0 {
        let Ok(Some(delivery)) =
            tokio::time::timeout(Duration::from_secs(30), deliveries.recv()).await
        else {
            log::warn!(
                target: "livemark::cli",
                "Gave up waiting for {} diagram(s)",
                pending
            );
            break;
        };
        pending -= 1;
        let tx = Transaction::new().with_effect(StateEffect::DiagramReady(delivery));
        let (next, _) = engine.apply(&state, tx)?;
        state = next;
    }
    Ok(state)
}

fn table(file: &Path) -> OverlayResult<()> {
    let text = std::fs::read_to_string(file)?;
    let mut parser = MarkdownParser::new()?;
    let tree = parser.parse(&text);
    let Some(node) = tree
        .nodes()
        .iter()
        .find(|node| node.kind == livemark::NodeKind::Table)
    else {
        return Err(livemark::OverlayError::Config {
            message: format!("no pipe table in {}", file.display()),
        });
    };
    let source = text.get(node.range()).unwrap_or_default();
    println!("{}", table_to_html(source));
    Ok(())
}
