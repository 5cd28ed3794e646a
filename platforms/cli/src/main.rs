use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utm::{
    analyze, analyze_input, Halt, MachineLibrary, MachineLoader, RunOutcome, TraceEvent,
    TraceSink, TuringMachine, UtmError, MAX_EXECUTION_STEPS,
};

const EXIT_ERROR: u8 = 1;
const EXIT_UNDEFINED_TRANSITION: u8 = 2;
const EXIT_BUDGET_EXCEEDED: u8 = 3;

/// `--tape` value that reads the tape from stdin.
const STDIN_TAPE: &str = "-";

/// A universal Turing machine interpreter.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  utm-cli machines/unary-increment.json --tape 111
  utm-cli --builtin busy-beaver-2 --trace
  echo 1011 | utm-cli machines/binary-increment.json --tape -")]
struct Cli {
    /// Path to a machine description file (.json)
    #[clap(required_unless_present_any = ["builtin", "list"], conflicts_with = "builtin")]
    machine: Option<PathBuf>,

    /// Run a built-in machine instead of a description file
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(long)]
    list: bool,

    /// Initial tape contents, or `-` to read them from stdin
    #[clap(short, long)]
    tape: Option<String>,

    /// Maximum number of steps to execute
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each step of the execution before it is applied
    #[clap(long)]
    trace: bool,

    /// Validate the machine and tape, and exit non-zero unless the machine halts
    #[clap(long)]
    strict: bool,

    /// Enable debug logging on stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        print!("{}", list_builtins());
        return ExitCode::SUCCESS;
    }

    match execute(&cli) {
        Ok(outcome) => {
            print!("{}", report(&outcome));
            ExitCode::from(exit_code(&outcome.halt, cli.strict))
        }
        Err(e) => {
            error!(error = %e, "execution aborted");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "utm=debug,utm_cli=debug"
    } else {
        "utm=warn,utm_cli=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Loads the machine and its tape, validates them in strict mode, and runs to completion.
fn execute(cli: &Cli) -> Result<RunOutcome, UtmError> {
    let (machine, sample_input) = load_machine(cli)?;
    let input = read_tape(cli.tape.as_deref(), sample_input, io::stdin().lock())?;

    if cli.strict {
        analyze(&machine)?;
        analyze_input(&machine, &input)?;
    }

    debug!(input = %input, max_steps = cli.max_steps, "starting machine");

    let mut print = |event: &TraceEvent| println!("{}", event);
    let sink: Option<&mut dyn TraceSink> = if cli.trace { Some(&mut print) } else { None };

    Ok(machine.run(machine.tape(&input), cli.max_steps, sink))
}

/// Loads a machine from `--builtin` or the positional path. Built-ins come with a sample tape.
fn load_machine(cli: &Cli) -> Result<(TuringMachine, Option<&'static str>), UtmError> {
    match (&cli.builtin, &cli.machine) {
        (Some(name), _) => Ok((
            MachineLibrary::get_by_name(name)?,
            Some(MachineLibrary::sample_input(name)?),
        )),
        (None, Some(path)) => Ok((MachineLoader::load_machine(path)?, None)),
        (None, None) => Err(UtmError::FileError(
            "No machine description given".to_string(),
        )),
    }
}

/// Picks the initial tape: `--tape` (with `-` reading `stdin`), then the built-in sample, then
/// empty. `stdin` is never touched unless asked for.
fn read_tape(
    tape: Option<&str>,
    sample_input: Option<&str>,
    mut stdin: impl Read,
) -> Result<String, UtmError> {
    match tape {
        Some(STDIN_TAPE) => {
            let mut buffer = String::new();
            stdin
                .read_to_string(&mut buffer)
                .map_err(|e| UtmError::FileError(format!("Failed to read from stdin: {}", e)))?;
            Ok(buffer.trim_end_matches(&['\r', '\n'][..]).to_string())
        }
        Some(tape) => Ok(tape.to_string()),
        None => Ok(sample_input.unwrap_or_default().to_string()),
    }
}

fn report(outcome: &RunOutcome) -> String {
    format!(
        "Final state: {}\nSteps executed: {}\nFinal tape: {}\nOutcome: {}\n",
        outcome.state,
        outcome.steps,
        outcome.rendered(),
        outcome.halt
    )
}

fn list_builtins() -> String {
    (0..MachineLibrary::count())
        .filter_map(|index| MachineLibrary::info(index).ok())
        .map(|info| {
            format!(
                "{:<20} {} states, {} transitions, sample tape {:?}\n",
                info.name, info.state_count, info.transition_count, info.sample_input
            )
        })
        .collect()
}

/// Every outcome exits 0 unless `strict`, which flags runs that did not reach the halt state.
fn exit_code(halt: &Halt, strict: bool) -> u8 {
    match halt {
        _ if !strict => 0,
        Halt::Halted => 0,
        Halt::UndefinedTransition { .. } => EXIT_UNDEFINED_TRANSITION,
        Halt::BudgetExceeded => EXIT_BUDGET_EXCEEDED,
    }
}
