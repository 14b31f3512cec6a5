//! Purpose: Hold top-level CLI command dispatch for `mvnprobe`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Keywords are searched sequentially; one request each, no retries.
//! Invariants: A search with no results prints nothing and still succeeds.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Search {
            keywords,
            endpoint,
            format,
        } => {
            let client = SearchClient::new(endpoint)?;
            for keyword in &keywords {
                let coordinates = client.search(keyword)?;
                match emit_coordinates(coordinates, format)? {
                    EmitOutcome::Written(printed) => {
                        tracing::debug!(keyword = %keyword, printed, "search complete");
                    }
                    EmitOutcome::Closed => {
                        tracing::debug!(keyword = %keyword, "stdout closed; stopping");
                        break;
                    }
                }
            }
            Ok(RunOutcome::ok())
        }
        Command::Stub { dir, print_path } => {
            let path = write_stub(&dir)?;
            if print_path {
                println!("{}", path.display());
            }
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "mvnprobe", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}
