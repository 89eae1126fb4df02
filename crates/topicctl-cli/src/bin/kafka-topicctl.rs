use clap::Parser;
use std::process::ExitCode;
use topicctl::telemetry;
use topicctl_cli::{Cli, run};
use topicctl_kafka::KafkaConnector;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging via tracing-subscriber with env filter support
    telemetry::init();

    match run(&cli.command, &KafkaConnector::new()).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_retryable_by_rerun() {
                eprintln!("Re-run with --if-not-exists=true to skip existing topics");
            }
            ExitCode::FAILURE
        }
    }
}
