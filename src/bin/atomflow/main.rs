use std::process::ExitCode;

mod cli;
mod commands;
mod logging;

fn main() -> ExitCode {
    let cli = cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
