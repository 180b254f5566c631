use clap::CommandFactory;
use clap_complete::Shell;

use crate::common::CliResult;

pub fn run(shell: Shell) -> CliResult {
    let mut cmd = crate::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
