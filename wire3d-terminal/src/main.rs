/// Wire3D Terminal Viewer
///
/// Displays a wireframe shape in the terminal.
/// Controls:
///   - WASD / Arrow Keys: Rotate the object
///   - I/J/K/L: Rotate the view
///   - E/R: Roll rotation
///   - P / C / F / G: Toggle projection, coordinate system, fill, rulings
///   - Tab: Next shape
///   - Q/ESC: Quit

use std::io;
use tracing::info;
use wire3d_terminal::{ArgError, Config, TerminalApp, USAGE};

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wire3d_terminal=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ArgError::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, err));
        }
    };

    info!(
        shape = config.shape.name(),
        system = config.system.tag(),
        "starting terminal viewer"
    );

    let mut app = TerminalApp::new(config)?;
    app.run()
}
