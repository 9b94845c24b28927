use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use thiserror::Error;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub mod amp;
pub mod int_code;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Get empty code in program text")]
    EmptyProgram,
    #[error("Failed to parse integer from string({0})")]
    ParseIntError(String),
    #[error("Invalid operation code({0}) found in execution")]
    InvalidOpcode(i64),
    #[error("Unknown parameter mode({0}) found")]
    UnknownParameterMode(i64),
    #[error("Invalid negative address({0}) found in execution")]
    NegativeAddress(i64),
    #[error("Not enough input in execution, inputs exhausted")]
    NotEnoughInput,
    #[error("Found error in device({0})")]
    Device(String),
}

#[derive(Debug, Parser)]
#[command(about = "Run an intcode program until it halts, then print its outputs")]
pub struct RunArgs {
    pub input_path: PathBuf,
    /// Integer fed to the program's input, in the given order
    #[arg(short, long = "input", allow_negative_numbers = true)]
    pub inputs: Vec<i64>,
    /// Line of text fed as ASCII codes after the integer inputs, ends with a newline
    #[arg(short, long)]
    pub ascii: Vec<String>,
    /// Render outputs as ASCII text
    #[arg(long)]
    pub ascii_output: bool,
    /// Memory patch applied before running, as ADDRESS=VALUE
    #[arg(short, long = "patch", value_parser = parse_patch)]
    pub patches: Vec<(i64, i64)>,
    /// Print the whole memory after halt
    #[arg(short, long)]
    pub dump: bool,
}

#[derive(Debug, Parser)]
#[command(about = "Search the phase setting which gives the largest thruster signal")]
pub struct AmpArgs {
    pub input_path: PathBuf,
    /// Wire the last amplifier back into the first one
    #[arg(short, long)]
    pub feedback: bool,
    /// Phase numbers to permute, defaults to 0..=4 (5..=9 with feedback)
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub phases: Vec<i64>,
}

impl AmpArgs {
    pub fn phases(&self) -> Vec<i64> {
        if !self.phases.is_empty() {
            self.phases.clone()
        } else if self.feedback {
            (5..=9).collect()
        } else {
            (0..=4).collect()
        }
    }
}

fn parse_patch(text: &str) -> Result<(i64, i64), String> {
    let (addr, value) = text
        .split_once('=')
        .ok_or_else(|| format!("Invalid patch({}), expects ADDRESS=VALUE", text))?;
    let addr = addr
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid address({}) in patch", addr))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid value({}) in patch", value))?;

    Ok((addr, value))
}

/// Installs a global `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
pub fn setup_tracing() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let sub = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt_layer);
    set_global_default(sub).context("Failed to set tracing subscriber")
}
