//! Fob pipeline CLI entry point: argument parsing, logging setup and task
//! dispatch.

use clap::Parser;
use fob_pipeline::{cli, commands, error, logger, pipeline::Step, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let options = commands::ProjectOptions {
        cwd: args.cwd,
        config: args.config,
    };

    let result = match args.command {
        cli::Command::Build => commands::build_execute(&options).await.map(|_| ()),
        cli::Command::Watch => commands::watch_execute(&options).await,
        cli::Command::Serve(serve_args) => commands::serve_execute(&options, &serve_args).await,
        cli::Command::Dev(serve_args) => commands::dev_execute(&options, &serve_args).await,
        cli::Command::Clean => run_task(&options, Step::Clean).await,
        cli::Command::Styles => run_task(&options, Step::Styles).await,
        cli::Command::StylesAssets => run_task(&options, Step::StyleAssets).await,
        cli::Command::Scripts => run_task(&options, Step::Scripts).await,
        cli::Command::Assets => run_task(&options, Step::Assets).await,
    };

    result.map_err(error::cli_error_to_miette)
}

async fn run_task(options: &commands::ProjectOptions, step: Step) -> error::Result<()> {
    commands::task_execute(options, step).await.map(|_| ())
}
