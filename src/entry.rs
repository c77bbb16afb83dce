use std::io::{IsTerminal, Write};

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{render_report, run_local};
use crate::args::LoadArgs;
use crate::config::{apply::is_cli, apply_config, load_config, prompt::prompt_missing};
use crate::engine::RunConfig;
use crate::error::{AppError, AppResult};

/// Process entry: parse, configure, run, report.
///
/// # Errors
///
/// Returns an error for invalid input, a failed startup step, or a summary
/// that cannot be written.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config).map_err(AppError::config)?;
    }

    let stdin = std::io::stdin();
    if !args.no_prompt && stdin.is_terminal() {
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        // The think range is only offered alongside the mandatory questions,
        // and only when the CLI did not set it.
        let ask_think = !is_cli(&matches, "min_think") && !is_cli(&matches, "max_think");
        prompt_missing(&mut args, ask_think, &mut input, &mut output)
            .map_err(AppError::config)?;
    }

    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid run configuration: {}", err);
            return Err(AppError::validation(err));
        }
    };
    let request_log = (!args.no_request_log).then(|| args.log_file.clone());
    let format = args.output_format;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(run_local(config, request_log.as_deref()))?;

    let rendered = render_report(&report, format)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    stdout.flush()?;
    Ok(())
}

fn parse_args() -> AppResult<(LoadArgs, ArgMatches)> {
    let matches = LoadArgs::command().get_matches();
    let args = LoadArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
