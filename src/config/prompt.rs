use std::io::{BufRead, Write};

use crate::args::parsers::parse_think_seconds;
use crate::args::{LoadArgs, PositiveU64, PositiveUsize};
use crate::error::ConfigError;

/// Invalid answers tolerated per field before giving up on it.
const MAX_ATTEMPTS: usize = 3;

/// Asks for run parameters that neither the CLI nor the config file supplied.
///
/// Returns `true` when at least one question was asked. A field left
/// unanswered stays unset and is reported by validation afterwards.
///
/// # Errors
///
/// Returns an error when reading the answer or writing the question fails.
pub(crate) fn prompt_missing<R, W>(
    args: &mut LoadArgs,
    ask_think: bool,
    input: &mut R,
    output: &mut W,
) -> Result<bool, ConfigError>
where
    R: BufRead,
    W: Write,
{
    let mut asked = false;

    if args.url.is_none() {
        asked = true;
        args.url = ask(input, output, "url", "Enter the URL to load test: ")?;
    }

    if args.target_duration.is_none() {
        asked = true;
        args.target_duration = ask_parsed::<PositiveU64, _, _>(
            input,
            output,
            "duration",
            "Enter the test duration in seconds: ",
        )?;
    }

    if args.concurrency.is_none() {
        asked = true;
        args.concurrency = ask_parsed::<PositiveUsize, _, _>(
            input,
            output,
            "concurrency",
            "Enter the number of concurrent users: ",
        )?;
    }

    if asked && ask_think {
        let question = format!(
            "Enter the think time range in seconds [{}-{}]: ",
            args.min_think, args.max_think
        );
        for _ in 0..MAX_ATTEMPTS {
            let Some(answer) = ask(input, output, "think time", &question)? else {
                break;
            };
            match parse_think_range(&answer) {
                Some((min, max)) => {
                    args.min_think = min;
                    args.max_think = max;
                    break;
                }
                None => write_line(
                    output,
                    "think time",
                    "Expected 'min-max' or 'min max' with min <= max.",
                )?,
            }
        }
    }

    Ok(asked)
}

fn ask_parsed<T, R, W>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    question: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    for _ in 0..MAX_ATTEMPTS {
        let Some(answer) = ask(input, output, field, question)? else {
            return Ok(None);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(err) => write_line(output, field, &format!("Invalid {}: {}", field, err))?,
        }
    }
    Ok(None)
}

fn ask<R, W>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    question: &str,
) -> Result<Option<String>, ConfigError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", question)
        .and_then(|()| output.flush())
        .map_err(|err| ConfigError::Prompt { field, source: err })?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| ConfigError::Prompt { field, source: err })?;
    let answer = line.trim();
    if read == 0 || answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(answer.to_owned()))
}

fn write_line<W: Write>(output: &mut W, field: &'static str, message: &str) -> Result<(), ConfigError> {
    writeln!(output, "{}", message).map_err(|err| ConfigError::Prompt { field, source: err })
}

fn parse_think_range(answer: &str) -> Option<(f64, f64)> {
    let (min, max) = answer
        .split_once('-')
        .or_else(|| answer.split_once(char::is_whitespace))?;
    let min = parse_think_seconds(min).ok()?;
    let max = parse_think_seconds(max).ok()?;
    (min <= max).then_some((min, max))
}
