//! The kvmirror-client executable supports the following command line arguments:
//!
//! `kvmirror-client set <KEY> <VALUE> [--url URL] [--db-file PATH]`
//!
//!     Set the value of a string key to a string on the remote store, mirroring
//!     the confirmed result into the local database file.
//!
//! `kvmirror-client get <KEY> [--url URL] [--db-file PATH]`
//!
//!     Get the string value of a given string key. Prints "Key not found" if the
//!     server does not have the key.
//!
//! `kvmirror-client rm <KEY> [--url URL] [--db-file PATH]`
//!
//!     Remove a given key from the remote store and the local mirror.
//!
//! `kvmirror-client mirror [--db-file PATH]`
//!
//!     Print the contents of the local mirror document. Works offline.
//!
//! `kvmirror-client clear-db [--db-file PATH]`
//!
//!     Reset the local mirror document to an empty mapping. Works offline.
//!
//! `kvmirror-client shell [--url URL] [--db-file PATH]`
//!
//!     Start an interactive session. The shell keeps one session alive, so the
//!     operation history accumulates and can be listed with `history`.
//!
//! `--url` defaults to http://localhost:8080 and `--db-file` to kvstore_db.json.
//! Errors are printed to stderr with a non-zero exit code.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use kvmirror::{
    HttpRemoteStore, OpKind, Operation, OperationOutcome, Result, Session, SessionConfig,
    DEFAULT_MIRROR_PATH, DEFAULT_SERVER_URL,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// the commands this executable can run
#[derive(Debug)]
enum Cmd {
    Set { key: String, value: String },
    Get { key: String },
    Rm { key: String },
    Mirror,
    ClearDb,
    Shell,
}

/// ['Opt'] holds parsed options from the command line
#[derive(Debug)]
struct Opt {
    url: String,
    db_file: PathBuf,
    cmd: Cmd,
}

fn main() {
    // configure a subscriber that will log messages to STDERR
    subscriber_config();

    let matches = App::new("kvmirror-client")
        .version(crate_version!())
        .about("a mirroring client for a remote key-value store")
        .subcommands(vec![
            SubCommand::with_name("set")
                .about("Set the value of a string key to a string")
                .arg(Arg::with_name("KEY").required(true).index(1))
                .arg(Arg::with_name("VALUE").required(true).index(2)),
            SubCommand::with_name("get")
                .about("Get the string value of a given string key")
                .arg(Arg::with_name("KEY").required(true).index(1)),
            SubCommand::with_name("rm")
                .about("Removes a given key")
                .arg(Arg::with_name("KEY").required(true).index(1)),
            SubCommand::with_name("mirror")
                .about("Prints the contents of the local mirror document"),
            SubCommand::with_name("clear-db")
                .about("Resets the local mirror document to an empty mapping"),
            SubCommand::with_name("shell").about("Starts an interactive session"),
        ])
        .arg(
            Arg::with_name("url")
                .long("url")
                .value_name("URL")
                .help("sets the base URL of the remote store")
                .default_value(DEFAULT_SERVER_URL),
        )
        .arg(
            Arg::with_name("db-file")
                .long("db-file")
                .value_name("PATH")
                .help("sets the path of the local mirror document")
                .default_value(DEFAULT_MIRROR_PATH),
        )
        .get_matches();

    let opt = match parse_options(matches) {
        Some(opt) => opt,
        None => {
            eprintln!("no command given; try --help");
            exit(1);
        }
    };

    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

/// parses the matches from the command line into an [`Opt`] struct
fn parse_options(matches: ArgMatches) -> Option<Opt> {
    let url = matches.value_of("url").unwrap().to_string();
    let db_file = PathBuf::from(matches.value_of("db-file").unwrap());

    let cmd = match matches.subcommand() {
        ("set", Some(args)) => Cmd::Set {
            key: args.value_of("KEY").map(String::from).unwrap(),
            value: args.value_of("VALUE").map(String::from).unwrap(),
        },
        ("get", Some(args)) => Cmd::Get {
            key: args.value_of("KEY").map(String::from).unwrap(),
        },
        ("rm", Some(args)) => Cmd::Rm {
            key: args.value_of("KEY").map(String::from).unwrap(),
        },
        ("mirror", Some(_)) => Cmd::Mirror,
        ("clear-db", Some(_)) => Cmd::ClearDb,
        ("shell", Some(_)) => Cmd::Shell,
        _ => return None,
    };

    Some(Opt { url, db_file, cmd })
}

/// opens a session and runs the requested command on it
fn run(opt: Opt) -> Result<()> {
    let config = SessionConfig {
        server_url: opt.url,
        mirror_path: opt.db_file,
        ..SessionConfig::default()
    };
    let mut session = Session::connect(config)?;

    match opt.cmd {
        Cmd::Set { key, value } => {
            let outcome = session.execute(Operation::Set { key, value })?;
            println!("{}", outcome.message);
        }
        Cmd::Get { key } => {
            let outcome = session.execute(Operation::Get { key })?;
            if let Some(value) = outcome.value {
                println!("{}", value);
            } else {
                println!("Key not found");
            }
        }
        Cmd::Rm { key } => {
            let outcome = session.execute(Operation::Del { key })?;
            println!("{}", outcome.message);
        }
        Cmd::Mirror => {
            for (key, value) in session.mirror_snapshot()? {
                println!("{} = {}", key, value);
            }
        }
        Cmd::ClearDb => {
            session.clear_mirror()?;
            println!("mirror and history cleared");
        }
        Cmd::Shell => shell(&mut session)?,
    }
    Ok(())
}

/// the interactive loop: one long-lived session, commands read line by line
fn shell(session: &mut Session<HttpRemoteStore>) -> Result<()> {
    print_menu();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("kvmirror> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let cmd = match tokens.first() {
            Some(cmd) => cmd.to_lowercase(),
            None => continue,
        };

        // commands are case-insensitive
        match cmd.as_str() {
            "set" => {
                if tokens.len() < 3 {
                    println!("usage: set KEY VALUE");
                } else {
                    report(session.execute(Operation::Set {
                        key: tokens[1].to_string(),
                        value: tokens[2..].join(" "),
                    }));
                }
            }
            "get" => {
                if tokens.len() != 2 {
                    println!("usage: get KEY");
                } else {
                    report(session.execute(Operation::Get {
                        key: tokens[1].to_string(),
                    }));
                }
            }
            "del" | "rm" => {
                if tokens.len() != 2 {
                    println!("usage: del KEY");
                } else {
                    report(session.execute(Operation::Del {
                        key: tokens[1].to_string(),
                    }));
                }
            }
            "history" => print_history(session),
            "mirror" => match session.mirror_snapshot() {
                Ok(entries) => {
                    for (key, value) in entries {
                        println!("{} = {}", key, value);
                    }
                }
                Err(e) => println!("error: {}", e),
            },
            "clear" => {
                session.clear_history();
                println!("history cleared");
            }
            "cleardb" => match session.clear_mirror() {
                Ok(()) => println!("mirror and history cleared"),
                Err(e) => println!("error: {}", e),
            },
            "help" => print_menu(),
            "exit" | "quit" => break,
            other => println!("unknown command: {}; type 'help'", other),
        }
    }
    Ok(())
}

/// prints one operation's result, or its error, without ending the shell
fn report(result: Result<OperationOutcome>) {
    match result {
        Ok(outcome) => match (&outcome.operation, &outcome.value) {
            (OpKind::Get, Some(value)) => println!("{} = {}", outcome.key, value),
            _ => println!("{}", outcome.message),
        },
        Err(e) => println!("error: {}", e),
    }
}

fn print_history(session: &Session<HttpRemoteStore>) {
    if session.history().is_empty() {
        println!("history is empty");
        return;
    }
    println!("{:<12} {:<5} {:<24} VALUE", "TIMESTAMP", "OP", "KEY");
    for record in session.history() {
        println!(
            "{:<12} {:<5} {:<24} {}",
            record.timestamp,
            record.operation.to_string(),
            record.key,
            record.value
        );
    }
}

fn print_menu() {
    println!("commands:");
    println!("  set KEY VALUE   store a key/value pair");
    println!("  get KEY         retrieve a stored value");
    println!("  del KEY         remove a key/value pair");
    println!("  history         list executed operations");
    println!("  mirror          list the local mirror contents");
    println!("  clear           clear the operation history");
    println!("  cleardb         clear the local mirror and the history");
    println!("  exit            leave the shell");
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        // all spans/events with a level higher than INFO will be logged
        .with_max_level(Level::INFO)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
