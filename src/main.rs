use anyhow::Context;
use argh::FromArgs;
use line_shell::{Interpreter, write_result};
use std::io;

/// Line shell with variables, pipes and a few built-in commands.
#[derive(FromArgs)]
struct Args {
    /// run a single line and exit
    #[argh(option, short = 'c')]
    command: Option<String>,

    /// prompt shown before each line
    #[argh(option, default = "String::from(\"$ \")")]
    prompt: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut shell: Interpreter = Interpreter::default();
    match args.command {
        Some(line) => {
            let result = shell.parse_input(&line);
            write_result(&mut io::stdout().lock(), &result).context("failed to write output")
        }
        None => shell.repl(&args.prompt).context("interactive session failed"),
    }
}
