//! `css_compare` CLI: decides whether two stylesheets are semantically
//! equivalent (spec.md §6).

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use css_compare::error::{CliError, EngineError};

/// Compare two CSS stylesheets for semantic equivalence.
#[derive(Parser, Debug)]
#[clap(name = "css_compare", version, about)]
struct Cli {
  /// First stylesheet.
  #[clap(parse(from_os_str))]
  css_1: PathBuf,
  /// Second stylesheet.
  #[clap(parse(from_os_str))]
  css_2: PathBuf,
  /// Where to write the result (`true`/`false`); defaults to stdout.
  #[clap(parse(from_os_str))]
  output: Option<PathBuf>,
}

fn main() -> ExitCode {
  env_logger::init();
  let cli = Cli::parse();
  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("css_compare: {}", err);
      match err {
        CliError::Usage(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
      }
    }
  }
}

fn run(cli: Cli) -> Result<(), CliError> {
  let equivalent = css_compare::compare_paths(&cli.css_1, &cli.css_2).map_err(cliify)?;
  let line = format!("{}\n", equivalent);
  match cli.output {
    Some(path) => std::fs::write(&path, line).map_err(CliError::Output)?,
    None => std::io::stdout().write_all(line.as_bytes()).map_err(CliError::Output)?,
  }
  Ok(())
}

fn cliify(e: EngineError) -> CliError {
  CliError::Engine(e)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_parses_two_positional_paths() {
    let cli = Cli::parse_from(["css_compare", "a.css", "b.css"]);
    assert_eq!(cli.css_1, PathBuf::from("a.css"));
    assert_eq!(cli.css_2, PathBuf::from("b.css"));
    assert!(cli.output.is_none());
  }

  #[test]
  fn cli_parses_optional_output() {
    let cli = Cli::parse_from(["css_compare", "a.css", "b.css", "out.txt"]);
    assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
  }
}
