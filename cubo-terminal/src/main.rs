/// Cubo Terminal - Interactive cuboctahedron
///
/// Usage: cubo-terminal [--config path/to/scene.json]
///
/// Controls:
///   - Drag (left button): Rotate
///   - Scroll: Zoom
///   - L: Toggle face labels
///   - Q/ESC: Quit
use std::env;
use std::fs;
use std::io;

use cubo_core::SceneConfig;
use cubo_terminal::TerminalApp;
use tracing::info;

fn load_config() -> io::Result<SceneConfig> {
    let args: Vec<String> = env::args().collect();
    let Some(flag) = args.iter().position(|a| a == "--config") else {
        return Ok(SceneConfig::default());
    };
    let path = args.get(flag + 1).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "--config expects a file path")
    })?;

    let text = fs::read_to_string(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to read config {}: {}", path, e))
    })?;
    let config = SceneConfig::from_json(&text).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to load config {}: {}", path, e),
        )
    })?;
    info!(path = %path, "loaded scene configuration");
    Ok(config)
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cubo_core=info,cubo_terminal=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config()?;

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Thank you for using the cuboctahedron viewer!");
    Ok(())
}
