use cbfifo::circular_buffer::{CircularBuffer, DEFAULT_STORE_SIZE};
use cbfifo::config::{default_config_path, load_config, validate, PipeConfig};
use cbfifo::pipe::Pipe;
use clap::Parser;
use log::{error, info};
use std::path::Path;
use std::process;

/// Stream stdin to stdout through a fixed-size circular buffer.
#[derive(Parser, Debug)]
#[command(name = "cbpipe", version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Bytes read from stdin per step (overrides the config file)
    #[arg(long)]
    producer_chunk: Option<usize>,

    /// Bytes taken from the buffer per step (overrides the config file)
    #[arg(long)]
    consumer_chunk: Option<usize>,

    /// Print transfer statistics to stderr when done
    #[arg(long)]
    stats: bool,
}

fn resolve_config(args: &Args, capacity: usize) -> Result<PipeConfig, Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path, capacity)?,
        None => {
            let path = default_config_path();
            if Path::new(&path).exists() {
                load_config(&path, capacity)?
            } else {
                info!("No config at {}, using defaults", path);
                PipeConfig::default()
            }
        }
    };

    if args.producer_chunk.is_none() && args.consumer_chunk.is_none() {
        return Ok(cfg);
    }
    if let Some(n) = args.producer_chunk {
        cfg.producer_chunk = n;
    }
    if let Some(n) = args.consumer_chunk {
        cfg.consumer_chunk = n;
    }
    validate(&cfg, capacity)?;
    Ok(cfg)
}

fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let capacity = CircularBuffer::<DEFAULT_STORE_SIZE>::CAPACITY;

    let cfg = match resolve_config(&args, capacity) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config: {}", e);
            process::exit(2);
        }
    };

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut pipe: Pipe<_, _> = Pipe::new(stdin, stdout, &cfg);

    match pipe.run() {
        Ok(stats) => {
            if args.stats {
                eprintln!("{} bytes in, {} bytes out", stats.bytes_in, stats.bytes_out);
                eprintln!(
                    "{} short enqueues, {} short dequeues, peak length {}",
                    stats.short_enqueues, stats.short_dequeues, stats.peak_length
                );
            }
        }
        Err(e) => {
            error!("Error streaming through buffer: {}", e);
            process::exit(e.to_status_code());
        }
    }
}
