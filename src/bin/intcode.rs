use anyhow::{Context, Result};
use clap::Parser;
use intcode::{
    int_code::{com::IntCodeComputer, io::Channel, read_int_code},
    RunArgs,
};

fn main() -> Result<()> {
    intcode::setup_tracing()?;
    let args = RunArgs::parse();
    let int_code = read_int_code(&args.input_path).with_context(|| {
        format!(
            "Failed to read intcode program from given file({}).",
            args.input_path.display()
        )
    })?;

    let mut chan = Channel::new(&args.inputs);
    for line in &args.ascii {
        chan.push_ascii(line);
    }
    let mut computer = IntCodeComputer::new(&int_code, chan);
    for &(addr, value) in &args.patches {
        computer
            .store(addr, value)
            .with_context(|| format!("Failed to patch memory at address({}).", addr))?;
    }
    computer
        .run_to_halt()
        .context("Failed to run intcode program to halt.")?;

    let chan = computer.stream();
    if args.ascii_output {
        print!("{}", chan.ascii_output());
        let non_ascii_outputs = chan.non_ascii_outputs();
        if !non_ascii_outputs.is_empty() {
            println!("Non-ASCII outputs: {}", join(&non_ascii_outputs));
        }
    } else {
        println!(
            "After {} steps, program halted, outputs: {}",
            computer.step_count(),
            join(chan.outputs().iter())
        );
    }
    if args.dump {
        println!("Memory: {}", join(computer.dump()));
        let far_cells = computer
            .far_cells()
            .map(|(addr, value)| format!("{}={}", addr, value))
            .collect::<Vec<_>>();
        if !far_cells.is_empty() {
            println!("Far memory: {}", far_cells.join(","));
        }
    }

    Ok(())
}

fn join<'a, I: IntoIterator<Item = &'a i64>>(values: I) -> String {
    values
        .into_iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
