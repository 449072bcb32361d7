//! `swxsoc` entry point

use swxsoc_cli::{commands, logging};
use swxsoc_config::ConfigHandle;

#[tokio::main]
async fn main() {
    let matches = swxsoc_cli::command().get_matches();
    let loader = commands::loader_from(&matches);

    let settings = match loader.load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init(&settings.logger) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let handle = match ConfigHandle::load(loader) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "cannot select mission");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match commands::run(&matches, &handle).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
