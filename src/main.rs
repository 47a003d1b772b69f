//! Murmur CLI binary entry point.

use clap::Parser;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use murmur::audio::{chunk_channel, AudioSynthesizer};
use murmur::cli::{compose_synthesizer, Cli, Commands, ConfigArgs, SayArgs};
use murmur::config::MurmurConfig;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match MurmurConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Say(args) => handle_say(&config, args).await,
            Commands::Config(args) => handle_config(&config, args),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_say(
    config: &MurmurConfig,
    args: SayArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let synthesizer = compose_synthesizer(config)?;
    let (sink, mut chunks) = chunk_channel();
    let cancel = CancellationToken::new();

    let produced = if args.stream {
        let words: Vec<String> = args.text.iter().map(|w| format!("{w} ")).collect();
        synthesizer
            .synthesize_stream(stream::iter(words).boxed(), &sink, &cancel, &args.generation)
            .await
    } else {
        let text = args.text.join(" ");
        synthesizer
            .synthesize(&text, &sink, &cancel, &args.generation)
            .await
    };
    synthesizer.on_stream_stop();
    drop(sink);

    let mut count = 0usize;
    let mut bytes = 0usize;
    while let Some(chunk) = chunks.recv().await {
        count += 1;
        bytes += chunk.data.len();
    }

    if produced {
        println!("Synthesized {count} chunk(s), {bytes} byte(s)");
    } else {
        println!("No audio produced (backend: {})", config.backend);
    }
    Ok(())
}

fn handle_config(
    config: &MurmurConfig,
    args: ConfigArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_toml_string()?);
    }
    Ok(())
}
