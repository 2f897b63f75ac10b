use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use treescout::app::{run_tree, NodeModulesRun, NODE_MODULES_USAGE};
use treescout::error::{exit_code_for, ArgumentError};
use treescout::logging::init_logger;
use treescout::prompt::stdin_confirm;
use treescout::{default_cache_path, ConsoleRender, GitCommitLookup, Render, Tone};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a directory tree with sizes, and find or delete node_modules directories",
    long_about = None
)]
struct Args {
    /// Directory to render (defaults to current directory)
    path: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Where to keep the node_modules scan results
    #[arg(long, env = "TREESCOUT_CACHE_FILE", value_name = "PATH")]
    cache_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find node_modules directories, list them by size, and optionally delete them
    ///
    /// Arguments: [ROOT] [--read | --delete] [--select --delete IDS]
    /// where IDS is `[1,2,3]`, `1,2,3`, `id1,id2` or a single `7` / `id7`.
    #[command(name = "node_modules")]
    NodeModules {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },
}

fn run(args: Args, render: &mut ConsoleRender) -> Result<()> {
    match args.command {
        Some(Command::NodeModules { args: raw }) => {
            let cache_path = match args.cache_file {
                Some(path) => path,
                None => default_cache_path()?,
            };
            let mut confirm = stdin_confirm();
            NodeModulesRun {
                render,
                confirm: &mut confirm,
                cache_path,
                show_progress: true,
            }
            .run(raw.as_slice())?;
        }
        None => {
            let path = args.path.unwrap_or_else(|| PathBuf::from("."));
            run_tree(&path, render, &GitCommitLookup)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    init_logger(args.verbose, !args.no_color && std::io::stderr().is_terminal());

    let node_modules_mode = matches!(args.command, Some(Command::NodeModules { .. }));
    let mut render = ConsoleRender;

    match run(args, &mut render) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render.message(Tone::Error, &format!("{:#}", err));
            if node_modules_mode && err.downcast_ref::<ArgumentError>().is_some() {
                for line in NODE_MODULES_USAGE {
                    render.message(Tone::Muted, line);
                }
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}
