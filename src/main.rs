//! routekit command line.
//!
//! ```text
//! routekit routes app.toml            print the registration plan
//! routekit serve app.toml [--port N]  serve the app until Ctrl+C
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use routekit::builtins;
use routekit::config::{load_app_file, resolve_app, HandlerRegistry};
use routekit::lifecycle::signals::shutdown_signal;
use routekit::observability::{logging::init_logging, metrics::init_metrics};
use routekit::registrar::RecordingRegistrar;
use routekit::{build, AppOptions, AppServer, AppServerOptions};

#[derive(Parser)]
#[command(name = "routekit")]
#[command(about = "Resolve and serve declarative route files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the flattened registration plan of an app file
    Routes { file: PathBuf },
    /// Serve an app file with the builtin handlers
    Serve {
        file: PathBuf,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Routes { file } => print_plan(file),
        Commands::Serve { file, port } => serve(file, port).await,
    }
}

fn print_plan(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let app_file = load_app_file(&file)?;

    let handlers = builtins::handlers();
    let middlewares = builtins::middlewares();
    let app = resolve_app(
        &app_file,
        &HandlerRegistry::<String>::names_of(handlers.names()),
        &HandlerRegistry::<String>::names_of(middlewares.names()),
    )?;

    let options: AppOptions<String, String, String> = AppOptions {
        routes: app.routes,
        middlewares: Some(app.middlewares),
        plugins: None,
    };
    for call in build(RecordingRegistrar::new(), options).calls() {
        println!("{}", call);
    }
    Ok(())
}

async fn serve(file: PathBuf, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let app_file = load_app_file(&file)?;
    init_logging(&app_file.observability);

    tracing::info!(file = %file.display(), "routekit v{} starting", env!("CARGO_PKG_VERSION"));

    if app_file.observability.metrics_enabled {
        match app_file.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %app_file.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = resolve_app(&app_file, &builtins::handlers(), &builtins::middlewares())?;
    let options = AppServerOptions {
        routes: app.routes,
        middlewares: Some(app.middlewares),
        plugins: None,
        server: app.server,
    };

    let mut server = AppServer::new(options)?;
    for skipped in server.skipped() {
        tracing::warn!(
            path = %skipped.path,
            method = %skipped.method,
            reason = %skipped.reason,
            "Route not served"
        );
    }

    server.listen(port).await?;
    if let Some(url) = server.url() {
        println!("Listening on {}", url);
    }

    shutdown_signal().await;
    server.close().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
