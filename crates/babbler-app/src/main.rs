//! babblerd: Babbler command protocol daemon.
//!
//! Reads its configuration from the TOML file named by the first argument
//! or the `BABBLER_CONFIG` environment variable (built-in defaults when
//! neither is given), then serves requests on stdin/stdout, or on a TCP
//! port when `transport.tcp_port` is set.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use babbler_core::Engine;
use babbler_link::BufferSizes;
use babbler_types::config::BabblerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BABBLER_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            BabblerConfig::load(path)?
        },
        None => BabblerConfig::default(),
    };

    let registry = commands::build_registry(&config.device);
    let engine = Engine::from_config(&registry, &config.protocol);
    let sizes = BufferSizes::from_config(&config.protocol);
    log::info!(
        "Starting babblerd: {} commands, {:?} mode, buffers {}/{}",
        registry.len(),
        engine.mode(),
        sizes.read,
        sizes.write,
    );

    if config.transport.tcp_port != 0 {
        babbler_link::serve_tcp(config.transport.tcp_port, &engine, sizes)?;
    } else {
        let served = babbler_link::serve(io::stdin().lock(), io::stdout().lock(), &engine, sizes)?;
        log::info!("stdin closed after {served} packets");
    }

    Ok(())
}
