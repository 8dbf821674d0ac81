use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use medi_nomogram::{Nomogram, NomogramConfig, NomogramError};
use medi_nomogram_cli::{
    render_calibration, render_options, render_score, selection_from_args, SELECTION_PROMPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "nomogram",
    version,
    about = "Point-based clinical risk calculator",
    long_about = "nomogram scores categorical risk factors with a nomogram point table and\n\
        converts the total into a risk using the nomogram's calibration curve.\n\n\
        The built-in tables estimate bacteremia in patients with persistent\n\
        neutropenic fever.\n\n\
        EXAMPLES:\n\
        \n  nomogram score --age '<=6' --sex Female --cancer AML --pr '>=122 beats/min'\
        \n  nomogram score --json --age '>6' --sex Male --cancer ALL --pr '<122 beats/min'\
        \n  nomogram options\
        \n  nomogram --tables custom.json calibration"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with point and calibration tables (defaults to the built-in nomogram)
    #[arg(long = "tables", value_name = "FILE", global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a selection and estimate its risk
    Score(ScoreArgs),

    /// List every risk factor with its levels and points
    Options,

    /// List the calibration curve anchors
    Calibration,

    /// Print the active tables as a JSON configuration document
    Export,
}

#[derive(Debug, Args, Clone)]
struct ScoreArgs {
    /// Age bracket (">6" or "≤6")
    #[arg(long, value_name = "AGE")]
    age: Option<String>,

    /// Sex ("Male" or "Female")
    #[arg(long, value_name = "SEX")]
    sex: Option<String>,

    /// Cancer type (ALL, AML, "Brain tumor", Neuroblastoma, Lymphoma, Others)
    #[arg(long, value_name = "TYPE")]
    cancer: Option<String>,

    /// Pulse rate ("<122 beats/min" or "≥122 beats/min")
    #[arg(long = "pr", value_name = "RATE")]
    pr: Option<String>,

    /// Output the result as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
    {
        eprintln!("warning: logger already initialized: {err}");
    }
}

fn load_nomogram(tables: &Option<PathBuf>) -> Result<Nomogram, NomogramError> {
    match tables {
        Some(path) => NomogramConfig::load(path)?.into_nomogram(),
        None => Ok(Nomogram::bacteremia()),
    }
}

fn run_score<W: Write>(nomogram: &Nomogram, args: &ScoreArgs, out: &mut W) -> i32 {
    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let selection = match selection_from_args(
        args.age.as_deref(),
        args.sex.as_deref(),
        args.cancer.as_deref(),
        args.pr.as_deref(),
    ) {
        Ok(Some(selection)) => selection,
        Ok(None) => return write_output(out, &format!("{SELECTION_PROMPT}\n")),
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let result = match nomogram.assess(&selection) {
        Ok(result) => result,
        Err(e) if e.is_selection_error() => {
            eprintln!("error: {e}");
            eprintln!("note: run `nomogram options` to list the levels of every factor");
            return 1;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    match mode {
        OutputMode::Text => write_output(out, &render_score(nomogram, &result)),
        OutputMode::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => write_output(out, &format!("{json}\n")),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                2
            }
        },
    }
}

fn write_output<W: Write>(out: &mut W, text: &str) -> i32 {
    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            2
        }
    }
}

fn run_export(nomogram: &Nomogram) -> i32 {
    match NomogramConfig::from_nomogram(nomogram).to_json_pretty() {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            2
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let nomogram = match load_nomogram(&cli.tables) {
        Ok(n) => n,
        Err(e) => {
            match &cli.tables {
                Some(path) => eprintln!("error: cannot use tables '{}': {e}", path.display()),
                None => eprintln!("error: {e}"),
            }
            return 2;
        }
    };

    match cli.command {
        Command::Score(args) => run_score(&nomogram, &args, &mut io::stdout().lock()),
        Command::Options => {
            print!("{}", render_options(&nomogram));
            0
        }
        Command::Calibration => {
            print!("{}", render_calibration(&nomogram));
            0
        }
        Command::Export => run_export(&nomogram),
    }
}

fn main() {
    std::process::exit(run_cli());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "nomogram",
            "-vv",
            "score",
            "--age",
            "<=6",
            "--pr",
            ">=122 beats/min",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.age.as_deref(), Some("<=6"));
                assert_eq!(args.sex, None);
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn tables_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");
        let mut config = NomogramConfig::default();
        config.title = "Custom".into();
        std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        let nomogram = load_nomogram(&Some(path)).unwrap();
        assert_eq!(nomogram.title(), "Custom");
    }

    #[test]
    fn invalid_selection_exits_with_one() {
        let args = ScoreArgs {
            age: Some(">6".into()),
            sex: Some("Male".into()),
            cancer: Some("ALL".into()),
            pr: None,
            json: false,
        };
        let mut out = Vec::<u8>::new();
        assert_eq!(run_score(&Nomogram::bacteremia(), &args, &mut out), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_selection_prompts() {
        let args = ScoreArgs {
            age: None,
            sex: None,
            cancer: None,
            pr: None,
            json: true,
        };
        let mut out = Vec::<u8>::new();
        assert_eq!(run_score(&Nomogram::bacteremia(), &args, &mut out), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Please select variables and run `score` again.\n"
        );
    }

    #[test]
    fn complete_selection_prints_report() {
        let args = ScoreArgs {
            age: Some("<=6".into()),
            sex: Some("Female".into()),
            cancer: Some("AML".into()),
            pr: Some(">=122 beats/min".into()),
            json: false,
        };
        let mut out = Vec::<u8>::new();
        assert_eq!(run_score(&Nomogram::bacteremia(), &args, &mut out), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Points:    228"));
        assert!(text.contains("Predicted Risk:  0.3000"));
    }
}
