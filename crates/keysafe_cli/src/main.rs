//! KeySafe terminal shell.
//!
//! # Responsibility
//! - Map subcommands onto `VaultSession` calls, one command per process.
//! - Phrase session outcomes as user-facing messages.
//!
//! Exit codes: 0 success, 1 rejected operation, 2 storage or setup failure.

mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Command, SignIn};
use keysafe_core::{
    core_version, default_log_level, init_logging, AddOutcome, EditOutcome, RecordChanges,
    RegisterOutcome, RemoveOutcome, SessionError, StoreLocation, ValidationError, VaultResult,
    VaultSession, VaultStore,
};
use log::info;
use output::Output;
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_REJECTED: u8 = 1;
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let out = Output::new(cli.json);
    if let Command::Version = cli.command {
        out.success(&format!("keysafe_core {}", core_version()));
        return ExitCode::SUCCESS;
    }

    let mut store = match VaultStore::open(StoreLocation::parse(&cli.db)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = run(&mut store, cli.command, &out);
    let closed = store.close();
    ExitCode::from(exit_status(result, closed, &out))
}

/// Maps a command result and the store close onto the process exit code.
fn exit_status(result: Result<bool, SessionError>, closed: VaultResult<()>, out: &Output) -> u8 {
    match (result, closed) {
        (Ok(true), Ok(())) => EXIT_SUCCESS,
        (Ok(false), Ok(())) => EXIT_REJECTED,
        (Err(SessionError::NotSignedIn), _) => {
            out.failure("Unknown user or password mismatch. Try again");
            EXIT_REJECTED
        }
        (Err(err), _) => {
            eprintln!("error: {err}");
            EXIT_FAILURE
        }
        (Ok(_), Err(err)) => {
            eprintln!("error: {err}");
            EXIT_FAILURE
        }
    }
}

/// Runs one command; `Ok(false)` means the vault rejected it.
fn run(store: &mut VaultStore, command: Command, out: &Output) -> Result<bool, SessionError> {
    info!("event=cli_command module=cli status=start command={}", command_name(&command));
    let mut session = VaultSession::new(store);

    match command {
        Command::Version => Ok(true),
        Command::Register { sign_in, confirm } => {
            let outcome = session.register(&sign_in.login, &sign_in.credential, &confirm)?;
            Ok(match outcome {
                RegisterOutcome::Registered(_) => report(out, true, "You are added. Please log in"),
                RegisterOutcome::AlreadyExists => {
                    report(out, false, "User already exists. Please log in")
                }
                RegisterOutcome::ConfirmationMismatch => {
                    report(out, false, "Password mismatch. Please try again")
                }
                RegisterOutcome::Invalid(err) => report(out, false, &invalid_message(err)),
            })
        }
        Command::List { sign_in } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            out.names(&session.list()?);
            Ok(true)
        }
        Command::Show { sign_in, name } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            Ok(match session.show(&name)? {
                Some(record) => {
                    out.record(&record);
                    true
                }
                None => report(out, false, "No entry at this name."),
            })
        }
        Command::Search { sign_in, prefix } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            out.names(&session.search(prefix.as_deref().unwrap_or_default())?);
            Ok(true)
        }
        Command::Add {
            sign_in,
            name,
            record_login,
            secret,
        } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            Ok(match session.add(&name, &record_login, &secret)? {
                AddOutcome::Added(_) => report(out, true, "Item successfully added to your vault"),
                AddOutcome::NameTaken | AddOutcome::Rejected => {
                    report(out, false, "Name already exists. Please retry.")
                }
                AddOutcome::Invalid(err) => report(out, false, &invalid_message(err)),
            })
        }
        Command::Edit {
            sign_in,
            name,
            new_name,
            new_login,
            new_secret,
        } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            let changes = RecordChanges {
                name: new_name,
                login: new_login,
                secret: new_secret,
            };
            Ok(match session.edit(&name, changes)? {
                EditOutcome::Updated(_) => report(out, true, "Item successfully updated"),
                EditOutcome::NotFound => report(out, false, "No entries found at this name."),
                EditOutcome::Rejected => report(out, false, "Name already exists. Please retry."),
                EditOutcome::Invalid(err) => report(out, false, &invalid_message(err)),
            })
        }
        Command::Delete { sign_in, name } => {
            sign_in_or_fail(&mut session, &sign_in)?;
            Ok(if session.delete(&name)? {
                report(out, true, "Item successfully removed")
            } else {
                report(out, false, "No entries found at this name.")
            })
        }
        Command::RemoveAccount { sign_in, confirm } => {
            if sign_in.credential != confirm {
                return Ok(report(out, false, "Password mismatch. Please retry"));
            }
            sign_in_or_fail(&mut session, &sign_in)?;
            Ok(match session.remove_account(&confirm)? {
                RemoveOutcome::Removed => report(out, true, "User removed from the system"),
                RemoveOutcome::CredentialMismatch => report(out, false, "Password Mismatch"),
                RemoveOutcome::NotFound => report(out, false, "User not found"),
            })
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Register { .. } => "register",
        Command::List { .. } => "list",
        Command::Show { .. } => "show",
        Command::Search { .. } => "search",
        Command::Add { .. } => "add",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::RemoveAccount { .. } => "remove_account",
        Command::Version => "version",
    }
}

fn sign_in_or_fail(session: &mut VaultSession<'_>, sign_in: &SignIn) -> Result<(), SessionError> {
    if session.login(&sign_in.login, &sign_in.credential)? {
        Ok(())
    } else {
        Err(SessionError::NotSignedIn)
    }
}

fn report(out: &Output, ok: bool, message: &str) -> bool {
    if ok {
        out.success(message);
    } else {
        out.failure(message);
    }
    ok
}

fn invalid_message(err: ValidationError) -> String {
    let mut message = err.to_string();
    if let Some(first) = message.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::{exit_status, run, EXIT_FAILURE, EXIT_REJECTED, EXIT_SUCCESS};
    use crate::cli::Cli;
    use crate::output::Output;
    use clap::Parser;
    use keysafe_core::{SessionError, StoreLocation, VaultError, VaultStore};

    fn run_args(store: &mut VaultStore, args: &[&str]) -> Result<bool, SessionError> {
        let mut argv = vec!["keysafe"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        run(store, cli.command, &Output::new(cli.json))
    }

    fn registered_store() -> VaultStore {
        let mut store = VaultStore::open(StoreLocation::InMemory).unwrap();
        let registered = run_args(
            &mut store,
            &["register", "--login", "alice", "--credential", "pw", "--confirm", "pw"],
        );
        assert!(registered.unwrap());
        store
    }

    #[test]
    fn add_then_duplicate_add_reports_rejection() {
        let mut store = registered_store();
        let add = [
            "add", "--login", "alice", "--credential", "pw", "site1", "me", "s3cret",
        ];

        let first = run_args(&mut store, &add);
        assert!(first.unwrap());
        let second = run_args(&mut store, &add);
        assert!(!second.unwrap());

        let out = Output::new(false);
        assert_eq!(exit_status(Ok(true), Ok(()), &out), EXIT_SUCCESS);
        assert_eq!(exit_status(Ok(false), Ok(()), &out), EXIT_REJECTED);
    }

    #[test]
    fn wrong_credential_exits_as_rejected() {
        let mut store = registered_store();

        let result = run_args(
            &mut store,
            &["list", "--login", "alice", "--credential", "nope"],
        );
        assert!(matches!(result, Err(SessionError::NotSignedIn)));

        let closed = store.close();
        assert_eq!(
            exit_status(result, closed, &Output::new(false)),
            EXIT_REJECTED
        );
    }

    #[test]
    fn unknown_login_exits_as_rejected() {
        let mut store = VaultStore::open(StoreLocation::InMemory).unwrap();

        let result = run_args(
            &mut store,
            &["show", "--login", "ghost", "--credential", "pw", "site1"],
        );
        assert_eq!(
            exit_status(result, Ok(()), &Output::new(true)),
            EXIT_REJECTED
        );
    }

    #[test]
    fn storage_failures_exit_with_failure_code() {
        let out = Output::new(false);
        let corrupt = Err(SessionError::Vault(VaultError::InvalidData(
            "bad row".to_string(),
        )));
        assert_eq!(exit_status(corrupt, Ok(()), &out), EXIT_FAILURE);

        let close_failed = Err(VaultError::InvalidData("close".to_string()));
        assert_eq!(exit_status(Ok(true), close_failed, &out), EXIT_FAILURE);
    }

    #[test]
    fn json_mode_runs_every_record_command() {
        let mut store = registered_store();
        let sign_in = ["--login", "alice", "--credential", "pw"];
        let with_sign_in = |head: &[&'static str], tail: &[&'static str]| {
            let mut args = vec!["--json"];
            args.extend_from_slice(head);
            args.extend_from_slice(&sign_in);
            args.extend_from_slice(tail);
            args
        };

        assert!(run_args(&mut store, &with_sign_in(&["add"], &["github", "me", "t"])).unwrap());
        assert!(run_args(&mut store, &with_sign_in(&["list"], &[])).unwrap());
        assert!(run_args(&mut store, &with_sign_in(&["show"], &["github"])).unwrap());
        assert!(run_args(&mut store, &with_sign_in(&["search"], &["git"])).unwrap());
        assert!(run_args(
            &mut store,
            &with_sign_in(&["edit"], &["github", "--new-secret", "t2"])
        )
        .unwrap());
        assert!(!run_args(&mut store, &with_sign_in(&["show"], &["missing"])).unwrap());
        assert!(run_args(&mut store, &with_sign_in(&["delete"], &["github"])).unwrap());

        assert_eq!(
            exit_status(Ok(true), store.close(), &Output::new(true)),
            EXIT_SUCCESS
        );
    }

    #[test]
    fn remove_account_requires_matching_confirmation() {
        let mut store = registered_store();

        let mismatch = run_args(
            &mut store,
            &["remove-account", "--login", "alice", "--credential", "pw", "--confirm", "x"],
        );
        assert!(!mismatch.unwrap());

        let removed = run_args(
            &mut store,
            &["remove-account", "--login", "alice", "--credential", "pw", "--confirm", "pw"],
        );
        assert!(removed.unwrap());

        let after = run_args(&mut store, &["list", "--login", "alice", "--credential", "pw"]);
        assert!(matches!(after, Err(SessionError::NotSignedIn)));
    }
}
