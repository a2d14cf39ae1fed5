use anyhow::Context as _;
use clap::Parser;

use billetline::{CpuViewport, MemoryCad, RunConfig, Services, SystemProcessRunner};

/// Build the billet line, animate it and encode the frames.
///
/// Every tunable lives in `params::defaults`; edit those and run again.
#[derive(Parser, Debug)]
#[command(name = "billetline", version, about)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    tracing_subscriber::fmt::init();

    let config = RunConfig::default();
    let mut cad = MemoryCad::new();
    let mut viewport = CpuViewport::new();
    let mut runner = SystemProcessRunner::new();
    let services = Services::new(&mut cad, &mut viewport, &mut runner, &config);

    let summary = billetline::run(&config, services).with_context(|| {
        format!(
            "billet line run into '{}'",
            config.output.output_dir.display()
        )
    })?;
    print!("{}", summary.report());

    let failures = summary.failures().count();
    if failures > 0 {
        eprintln!("{failures} stage(s) failed; see the report above");
    }
    Ok(())
}
