use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;

use nextword::{ConfigArgs, PredictRequest, PredictionContext};

/// Continue a seed phrase from the command line, or read seeds from stdin.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Words to append to each seed
    #[arg(short = 'n', long, default_value_t = 1)]
    next_words: usize,

    /// Seed text; omit for an interactive session
    seed: Vec<String>,
}

fn run(ctx: &PredictionContext, seed: &str, next_words: usize) -> bool {
    let req = PredictRequest { seed_text: seed.to_string(), next_words };
    match ctx.predict(&req) {
        Ok(resp) => {
            println!("{}", resp.predicted_text);
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let ctx = match args.config.resolve().and_then(|cfg| PredictionContext::load(&cfg)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("initialization failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !args.seed.is_empty() {
        let seed = args.seed.join(" ");
        return if run(&ctx, &seed, args.next_words) { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    println!("Interactive prediction — enter a seed, 'quit' or Ctrl-D to exit");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        if s.eq_ignore_ascii_case("quit") || s.eq_ignore_ascii_case("exit") {
            break;
        }
        run(&ctx, s, args.next_words);
        let _ = stdout.flush();
    }
    ExitCode::SUCCESS
}
