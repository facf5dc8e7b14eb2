use std::io;
use std::io::prelude::*;
use std::process;

use calculator::format::{excerpt, EXCERPT_WIDTH};
use calculator::{evaluate_with, Config, EvalError};
use clap::{ArgAction, Parser};
use log::LevelFilter;

/// Evaluates infix arithmetic expressions such as "3 + (5 + 1)", "sqrt(100)"
/// or "2=2".
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print only the error message, without the expression excerpt.
    #[arg(short, long)]
    quiet: bool,

    /// Log evaluation steps (-v for results, -vv for every token).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Relative tolerance used by `=`.
    #[arg(long, default_value_t = 1e-10)]
    epsilon: f64,

    /// Expressions to evaluate. Starts an interactive session when empty.
    #[arg(allow_hyphen_values = true)]
    expressions: Vec<String>,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_error(line: &str, err: &EvalError, config: &Config) {
    eprintln!("error: {}", err);

    if let (Some(column), false) = (err.column, config.quiet) {
        eprintln!("{}", excerpt(line, column, EXCERPT_WIDTH));
    }
}

fn execute_line<W: Write>(
    output: &mut W,
    line: &str,
    config: &Config,
) -> io::Result<Option<EvalError>> {
    match evaluate_with(line, config) {
        Ok(val) => {
            writeln!(output, "{}", val)?;
            Ok(None)
        }
        Err(err) => {
            print_error(line, &err, config);
            Ok(Some(err))
        }
    }
}

/// Evaluates `lines` in order and returns the exit code. Stops at the first
/// failing expression.
fn execute_all<W: Write>(output: &mut W, lines: &[String], config: &Config) -> io::Result<i32> {
    for line in lines {
        if let Some(err) = execute_line(output, line, config)? {
            return Ok(err.kind.code());
        }
    }

    Ok(0)
}

fn interact(config: &Config) -> io::Result<()> {
    let exit_cmds = ["exit", "quit", ""];
    let input = io::stdin();
    let mut output = io::stdout();

    loop {
        output.write_all(b">>> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim_end_matches(&['\n', '\r'][..]);
        if exit_cmds.contains(&line.trim()) {
            break;
        }

        execute_line(&mut output, line, config)?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = Config {
        quiet: args.quiet,
        epsilon: args.epsilon,
    };

    let result = if args.expressions.is_empty() {
        interact(&config).map(|()| 0)
    } else {
        execute_all(&mut io::stdout(), &args.expressions, &config)
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    };

    process::exit(code);
}

#[cfg(test)]
mod test {
    use super::execute_all;
    use calculator::Config;

    fn run(lines: &[&str]) -> (i32, String) {
        let lines: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        let config = Config {
            quiet: true,
            ..Config::default()
        };

        let mut output = vec![];
        let code = execute_all(&mut output, &lines, &config).unwrap();
        (code, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_all_succeed() {
        let expected = "4\nTrue\n1.1805916207174e21\n";
        assert_eq!(run(&["2+2", "5+3=2+6", "2^70"]), (0, expected.into()));
        assert_eq!(run(&[]), (0, "".into()));
    }

    #[test]
    fn test_first_error_stops() {
        assert_eq!(run(&["2+2", "(2", "3"]), (2, "4\n".into()));
        assert_eq!(run(&["foo", "2+2"]), (8, "".into()));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(run(&["2**2"]).0, 1);
        assert_eq!(run(&["(2+2))"]).0, 3);
        assert_eq!(run(&["2+&3"]).0, 4);
        assert_eq!(run(&[""]).0, 5);
        assert_eq!(run(&["foo(2)"]).0, 6);
        assert_eq!(run(&["sqrt()"]).0, 7);
    }
}
