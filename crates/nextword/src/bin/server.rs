use std::sync::Arc;
use std::thread;

use clap::Parser;
use tiny_http::Server;

use nextword::{http, ConfigArgs, PredictionContext};

/// Next-word prediction HTTP server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config.resolve() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // nothing is served until the context is fully built
    let ctx = match PredictionContext::load(&config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            log::error!("initialization failed: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let addr = config.bind_addr();
    let server = match Server::http(&addr) {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to bind {addr}: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::Other, format!("server bind error: {e}")));
        }
    };
    log::info!("Server running on http://{addr}");

    let max_body_bytes = config.max_body_bytes;
    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || http::serve(&ctx, request, max_body_bytes));
    }

    Ok(())
}
