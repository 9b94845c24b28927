use anyhow::{Context, Result};
use clap::Parser;
use intcode::{amp::best_setting, int_code::read_int_code, AmpArgs};

fn main() -> Result<()> {
    intcode::setup_tracing()?;
    let args = AmpArgs::parse();
    let int_code = read_int_code(&args.input_path).with_context(|| {
        format!(
            "Failed to read intcode program from given file({}).",
            args.input_path.display()
        )
    })?;

    let phases = args.phases();
    let (signal, setting) = best_setting(&int_code, &phases, args.feedback)
        .with_context(|| format!("Failed to run amplifiers with phases({:?}).", phases))?;
    println!(
        "The maximum output signal({}) of amplifier {} can be achieved by setting({:?})",
        signal,
        if args.feedback { "loop" } else { "chain" },
        setting
    );

    Ok(())
}
