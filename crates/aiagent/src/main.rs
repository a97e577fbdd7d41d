//! A simple program demonstrates how to use `aiagent` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::{self, BufRead, Write as _};
use std::process::{self, ExitCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use aiagent::core::{Answer, ConfigBuilder, OrchestratorBuilder};
use aiagent::http::{HttpConfigBuilder, HttpTransport};
use aiagent::tools::with_builtin_tools;
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_PROMPT_SUFFIX: &str = ", response without markdown and without Emoji";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let Ok(api_key) = env::var("LLM_API_KEY") else {
        eprintln!("LLM_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let mut config = ConfigBuilder::with_api_key(api_key);
    if let Ok(endpoint) = env::var("LLM_URL") {
        config = config.with_endpoint(endpoint);
    }
    if let Ok(model) = env::var("LLM_MODEL") {
        config = config.with_model(model);
    }
    if let Ok(system_prompt) = env::var("LLM_SYSTEM_PROMPT") {
        config = config.with_system_prompt(system_prompt);
    }
    if let Some(suffix) = prompt_suffix(env::var("LLM_PROMPT_SUFFIX").ok()) {
        config = config.with_prompt_suffix(suffix);
    }
    let config = config.build();
    info!("using {config:?}");

    let http_config = HttpConfigBuilder::new()
        .with_timeout(REQUEST_TIMEOUT)
        .build();
    let transport = match HttpTransport::new(http_config) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let orchestrator =
        with_builtin_tools(OrchestratorBuilder::with_transport(config, transport))
            .build();
    for definition in orchestrator.tool_definitions() {
        println!(
            "{}🔧 {}: {}",
            BAR_CHAR.bright_yellow(),
            definition.name.bright_white().bold(),
            definition.description
        );
    }
    if let Err(err) = orchestrator.start() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let stopped = Arc::new(AtomicBool::new(false));
    let consumer = thread::spawn({
        let orchestrator = orchestrator.clone();
        let stopped = Arc::clone(&stopped);
        move || {
            while !stopped.load(Ordering::Acquire) {
                if let Some(answer) = orchestrator.wait_answer(POLL_INTERVAL) {
                    print_answer(&answer);
                    if is_farewell(answer.content()) {
                        orchestrator.shutdown();
                        process::exit(0);
                    }
                }
            }
        }
    });

    let mut next_id: u64 = 0;
    let mut stdin = io::stdin().lock();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin) else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        orchestrator.submit_prompt(format!("session_{next_id}"), line);
        next_id += 1;
    }

    stopped.store(true, Ordering::Release);
    if consumer.join().is_err() {
        error!("answer consumer panicked");
    }
    orchestrator.shutdown();
    ExitCode::SUCCESS
}

/// An unset variable selects the default suffix, an empty one disables it.
fn prompt_suffix(var: Option<String>) -> Option<String> {
    match var {
        None => Some(DEFAULT_PROMPT_SUFFIX.to_owned()),
        Some(suffix) if suffix.is_empty() => None,
        Some(suffix) => Some(suffix),
    }
}

/// The session ends once the model says goodbye.
fn is_farewell(content: &str) -> bool {
    content.contains("bye") || content.contains("Bye")
}

fn print_answer(answer: &Answer) {
    println!(
        "\n{}🤖 {}",
        BAR_CHAR.bright_cyan(),
        answer.content().bright_white()
    );
    print!("> ");
    io::stdout().flush().ok();
}

fn read_line(stdin: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
