use clap::Parser;
use stockcast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
