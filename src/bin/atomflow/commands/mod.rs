mod build;
mod summary;

use anyhow::Result;

use crate::cli::Command;

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Build(args) => build::run_build(args),
        Command::Summary(args) => summary::run_summary(args),
    }
}
