//! revmig command line
//!
//! - `revmig check --config <file>`: validate a pipeline and its inverse
//! - `revmig run --config <file> --dir <path> [--forward|--reverse]`: run it over a directory

mod logging;

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use revmig_changes::Changes;
use revmig_core::{Direction, Executor, PipelineFile};
use revmig_transform::{TracingConsole, WorkTree};
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .short('c')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Pipeline file (TOML)");

    Command::new("revmig")
        .version(revmig_core::VERSION)
        .about("Run reversible migration pipelines")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a pipeline and check it can be reversed")
                .arg(config.clone()),
        )
        .subcommand(
            Command::new("run")
                .about("Apply a pipeline to a directory in place")
                .arg(config)
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to transform"),
                )
                .arg(
                    Arg::new("reverse")
                        .long("reverse")
                        .action(ArgAction::SetTrue)
                        .help("Run the inverse pipeline"),
                )
                .arg(
                    Arg::new("forward")
                        .long("forward")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("reverse")
                        .help("Run the declared pipeline, overriding the file's direction"),
                )
                .arg(
                    Arg::new("message")
                        .long("message")
                        .short('m')
                        .default_value("")
                        .help("Change message the pipeline may rewrite"),
                ),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    if let Err(err) = logging::init(matches.get_flag("log-json")) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = match matches.subcommand() {
        Some(("check", args)) => check(args),
        Some(("run", args)) => run(args),
        _ => Err(anyhow!("unknown command")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .ok_or_else(|| anyhow!("missing --{name}"))
}

fn load(args: &ArgMatches) -> anyhow::Result<PipelineFile> {
    let path = path_arg(args, "config")?;
    PipelineFile::load(path).with_context(|| format!("loading {}", path.display()))
}

fn check(args: &ArgMatches) -> anyhow::Result<()> {
    let file = load(args)?;
    let pipeline = file.to_pipeline()?;

    println!("pipeline '{}': {} step(s)", pipeline.name(), pipeline.forward().len());
    for step in pipeline.forward().steps() {
        println!("  {}", step.describe());
    }

    pipeline.check_reversible()?;
    println!("reversible");
    Ok(())
}

/// Command-line flags win over the file's `direction`
fn resolve_direction(args: &ArgMatches, configured: Direction) -> Direction {
    if args.get_flag("reverse") {
        Direction::Reverse
    } else if args.get_flag("forward") {
        Direction::Forward
    } else {
        configured
    }
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let file = load(args)?;
    let dir = path_arg(args, "dir")?;
    let message = args.get_one::<String>("message").map_or("", String::as_str);
    let direction = resolve_direction(args, file.direction);

    let pipeline = file.to_pipeline()?;
    let base = WorkTree::load_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), files = base.len(), "loaded working tree");
    let mut tree = base.clone();

    let outcome = Executor::new(&TracingConsole)
        .fail_on_console_errors(file.fail_on_console_errors)
        .run(&pipeline, direction, &mut tree, Changes::empty(), message)?;

    tree.store_dir(dir, &base)
        .with_context(|| format!("writing {}", dir.display()))?;

    println!(
        "{} run of '{}' applied {} step(s)",
        outcome.direction,
        pipeline.name(),
        outcome.steps_applied
    );
    if !outcome.message.is_empty() {
        println!("{}", outcome.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_run() {
        let matches = cli()
            .try_get_matches_from(["revmig", "run", "-c", "p.toml", "--dir", "src", "--reverse"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert!(args.get_flag("reverse"));
        assert_eq!(path_arg(args, "dir").unwrap(), &PathBuf::from("src"));
    }

    fn run_args(extra: &[&str]) -> ArgMatches {
        let mut argv = vec!["revmig", "run", "-c", "p.toml", "-d", "src"];
        argv.extend_from_slice(extra);
        let matches = cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("run").unwrap().clone()
    }

    #[test]
    fn flags_override_configured_direction() {
        assert_eq!(resolve_direction(&run_args(&[]), Direction::Reverse), Direction::Reverse);
        assert_eq!(
            resolve_direction(&run_args(&["--forward"]), Direction::Reverse),
            Direction::Forward
        );
        assert_eq!(
            resolve_direction(&run_args(&["--reverse"]), Direction::Forward),
            Direction::Reverse
        );
    }

    #[test]
    fn forward_conflicts_with_reverse() {
        let err = cli()
            .try_get_matches_from([
                "revmig", "run", "-c", "p.toml", "-d", "src", "--forward", "--reverse",
            ])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn config_is_required() {
        assert!(cli().try_get_matches_from(["revmig", "check"]).is_err());
    }
}
