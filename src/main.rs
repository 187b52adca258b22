use anyhow::{Context, Result};
use janus::config::JanusConfig;
use janus::content::DualBuffer;
use janus::{TextContent, cli};
use log::{debug, info};
use std::io::{self, Write};

/// Load the input into one side of a dual buffer and print the other side.
fn main() -> Result<()> {
    let args = cli::parse_args();

    // RUST_LOG still wins over the default level
    let level = if args.trace {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = JanusConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.check_version();

    let table = args.table.unwrap_or_else(|| config.table());
    info!("Using translation table {table}");
    let mut content = DualBuffer::new(table.build(config.cache_capacity()))
        .with_hint_policy(config.hint_policy());

    let input = args.read_input().context("Failed to read input")?;
    let side = args.input_side();
    let change = content.set_text(side, &input);
    debug!("Loaded {:?} buffer: {change:?}", side);

    let output = content.side(side.opposite());
    debug!("{:?} buffer has {} lines", side.opposite(), output.line_count());

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.text().as_bytes())
        .context("Failed to write output")?;
    stdout.flush()?;
    Ok(())
}
