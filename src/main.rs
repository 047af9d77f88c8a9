//! avdemux - demux a container and report what was delivered
//!
//! Runs one session over the given path or URL with a summarizing consumer,
//! stops on Ctrl-C or after `--max-packets`, and prints the summary.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avdemux::config::{AppConfig, LogFormat};
use avdemux::error::{Error, Result};
use avdemux::{demux, Limit, StopToken, SummarySink};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path or URL of the container to demux
    input: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configuration file
    #[arg(long)]
    log_level: Option<String>,

    /// Stop after this many read iterations
    #[arg(short = 'n', long)]
    max_packets: Option<u64>,

    /// Log every dispatched packet
    #[arg(short, long)]
    packets: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config);
    tracing::info!("avdemux v{} starting", VERSION);
    tracing::info!("FFmpeg version: {}", avdemux::ffmpeg::version_info());

    avdemux::ffmpeg::init()?;
    avdemux::ffmpeg::install_log_filter(config.av_log_level()?);

    let token = StopToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping session");
            ctrl_c_token.stop();
        }
    });

    let url = args.input.clone();
    let report_config = config.report.clone();
    let (sink, result) = tokio::task::spawn_blocking(move || {
        let mut sink = SummarySink::new(report_config.print_packets);
        let result = match report_config.max_packets {
            Some(limit) => demux(&url, &mut sink, Limit::new(token, limit)),
            None => demux(&url, &mut sink, token),
        };
        (sink, result)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    print_summary(&sink, config.report.json)?;

    let report = result?;
    tracing::info!(
        "Done: {:?}, {} packets read, {} dropped",
        report.outcome,
        report.stats.packets_read,
        report.stats.excluded + report.stats.discarded + report.stats.unrouted
    );
    Ok(())
}

/// Configuration file (if any) with command-line overrides applied
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.max_packets.is_some() {
        config.report.max_packets = args.max_packets;
    }
    config.report.print_packets |= args.packets;
    config.report.json |= args.json;
    Ok(config)
}

/// Initialize logging with tracing
fn init_logging(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_summary(sink: &SummarySink, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(sink)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        println!("{}", out);
        return Ok(());
    }

    if let Some(url) = &sink.url {
        println!("input:  {} ({})", url, sink.format_name.as_deref().unwrap_or("?"));
    }
    if let Some(info) = &sink.media_info {
        println!("duration: {} ms", info.duration_ms);
        if info.has_video {
            println!(
                "video:  {} {}x{} @ {} fps, rotation {}",
                info.video_codec.name(),
                info.video_width,
                info.video_height,
                info.video_frame_rate,
                info.video_rotation
            );
        }
        if info.has_audio {
            println!(
                "audio:  {} {} Hz, {} ch, {} samples/frame",
                info.audio_codec.name(),
                info.audio_sample_rate,
                info.audio_channels,
                info.samples_per_frame
            );
        }
    }
    println!(
        "packets: video={} ({} bytes), audio={} ({} bytes)",
        sink.video.packets, sink.video.bytes, sink.audio.packets, sink.audio.bytes
    );
    if let Some(err) = &sink.error {
        println!("error:  {} ({})", err.message, err.code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from(["avdemux", "clip.mp4", "-n", "10", "--json", "--log-level", "debug"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.report.max_packets, Some(10));
        assert!(config.report.json);
        assert!(!config.report.print_packets);
        assert_eq!(config.logging.level, "debug");
    }
}
