use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub pipe: PipeConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PipeConfig {
    /// Bytes read from the input and offered to the buffer per step.
    #[serde(default = "default_producer_chunk")]
    pub producer_chunk: usize,
    /// Bytes requested from the buffer per step.
    #[serde(default = "default_consumer_chunk")]
    pub consumer_chunk: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            producer_chunk: default_producer_chunk(),
            consumer_chunk: default_consumer_chunk(),
        }
    }
}

fn default_producer_chunk() -> usize {
    64
}

fn default_consumer_chunk() -> usize {
    32
}

pub fn default_config_path() -> String {
    if let Ok(home) = std::env::var("HOME") {
        format!("{}/.config/cbfifo/config.toml", home)
    } else {
        "/etc/cbfifo/config.toml".to_string()
    }
}

pub fn load_config(path: &str, capacity: usize) -> Result<PipeConfig, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Config file not found: {}", path).into());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;

    let cfg = parse_config(&content, capacity)
        .map_err(|e| format!("Invalid config {}: {}", path, e))?;

    log::info!("Config loaded from: {}", path);
    Ok(cfg)
}

pub fn parse_config(
    content: &str,
    capacity: usize,
) -> Result<PipeConfig, Box<dyn std::error::Error>> {
    let cfg: Config = toml::from_str(content)?;
    validate(&cfg.pipe, capacity)?;
    Ok(cfg.pipe)
}

/// Reject chunk sizes the pipe cannot make progress with.
pub fn validate(cfg: &PipeConfig, capacity: usize) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.producer_chunk == 0 {
        return Err("producer_chunk must be at least 1".into());
    }
    if cfg.consumer_chunk == 0 {
        return Err("consumer_chunk must be at least 1".into());
    }

    log::info!(
        "Pipe chunks: producer {} bytes, consumer {} bytes, buffer capacity {} bytes",
        cfg.producer_chunk,
        cfg.consumer_chunk,
        capacity
    );
    if cfg.producer_chunk > capacity {
        log::warn!(
            "producer_chunk {} exceeds buffer capacity {} - every enqueue will be short",
            cfg.producer_chunk,
            capacity
        );
    }
    if cfg.consumer_chunk > capacity {
        log::warn!(
            "consumer_chunk {} exceeds buffer capacity {} - every dequeue will be short",
            cfg.consumer_chunk,
            capacity
        );
    }
    Ok(())
}
