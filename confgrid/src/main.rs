//! # confgrid
//!
//! CLI for maintaining JSON-backed configuration tables with spreadsheet
//! paste-import.
//!
//! ## Overview
//!
//! confgrid is built on top of confgridlib and exposes the fixed menu of
//! table actions as subcommands. Tables are stored one JSON file per table
//! under the data directory, optionally namespaced per customer.
//!
//! ## Usage
//!
//! ```bash
//! # Show a table
//! confgrid show "Data Load Parameter"
//!
//! # Edit it
//! confgrid add-column "Data Load Parameter" Host
//! confgrid add-row "Data Load Parameter" Host=db1 Port=5432
//! confgrid rename-column "Data Load Parameter" Host Hostname
//! confgrid delete-column "Data Load Parameter" Hostname
//! confgrid delete-rows "Data Load Parameter" 0 2
//! confgrid set-cell "Data Load Parameter" 0 Port 5433
//!
//! # Paste-import tab-separated spreadsheet data from stdin or a file
//! pbpaste | confgrid import "Data Load Parameter"
//! confgrid import "Data Load Parameter" --file rows.tsv
//!
//! # Keep per-customer instances of the same table
//! confgrid --customer Acme show "Data Load Parameter"
//!
//! # Credential management for the login shell
//! confgrid user set-password alice secret
//! confgrid user add-customer alice Acme
//! confgrid user check alice secret
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use confgridlib::{CredentialStore, EditOutcome, TableEditor, TableId, TableStore};
use console::style;

mod render;

/// Build the clap Command structure
fn build_command() -> Command {
    let table_arg = Arg::new("table").help("Table name").required(true);

    Command::new("confgrid")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Maintain JSON-backed configuration tables with spreadsheet paste-import")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .global(true)
                .default_value("tables")
                .help("Directory holding the table files"),
        )
        .arg(
            Arg::new("customer")
                .short('c')
                .long("customer")
                .global(true)
                .help("Customer scope for the table instance"),
        )
        .subcommand(
            Command::new("show")
                .about("Display a table")
                .arg(table_arg.clone())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["table", "json"])
                        .default_value("table")
                        .help("Output format"),
                ),
        )
        .subcommand(Command::new("list").about("List stored tables for the current scope"))
        .subcommand(
            Command::new("add-column")
                .about("Add a column, blank in every existing row")
                .arg(table_arg.clone())
                .arg(Arg::new("name").help("New column name").required(true)),
        )
        .subcommand(
            Command::new("add-row")
                .about("Add a row; every column needs a COLUMN=VALUE pair")
                .arg(table_arg.clone())
                .arg(
                    Arg::new("values")
                        .help("Cell values as COLUMN=VALUE")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("rename-column")
                .about("Rename a column, keeping its cells")
                .arg(table_arg.clone())
                .arg(Arg::new("old").help("Current column name").required(true))
                .arg(Arg::new("new").help("New column name").required(true)),
        )
        .subcommand(
            Command::new("delete-column")
                .about("Delete a column and its cells")
                .arg(table_arg.clone())
                .arg(Arg::new("name").help("Column to delete").required(true)),
        )
        .subcommand(
            Command::new("delete-rows")
                .about("Delete rows in an inclusive 0-based index range")
                .arg(table_arg.clone())
                .arg(
                    Arg::new("start")
                        .help("First row index")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("end")
                        .help("Last row index (inclusive)")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("set-cell")
                .about("Overwrite a single cell value")
                .arg(table_arg.clone())
                .arg(
                    Arg::new("row")
                        .help("Row index (0-based)")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(Arg::new("column").help("Column name").required(true))
                .arg(Arg::new("value").help("New cell value").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Import tab-separated spreadsheet data (stdin or --file)")
                .arg(table_arg.clone())
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .help("Read the pasted data from a file instead of stdin"),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Manage login credentials")
                .subcommand_required(true)
                .arg(
                    Arg::new("users-file")
                        .long("users-file")
                        .global(true)
                        .default_value("users.json")
                        .help("Credential file"),
                )
                .subcommand(
                    Command::new("set-password")
                        .about("Create a user or change their password")
                        .arg(Arg::new("name").help("Username").required(true))
                        .arg(Arg::new("password").help("Password").required(true)),
                )
                .subcommand(
                    Command::new("add-customer")
                        .about("Associate a customer scope with a user")
                        .arg(Arg::new("name").help("Username").required(true))
                        .arg(Arg::new("customer").help("Customer name").required(true)),
                )
                .subcommand(
                    Command::new("check")
                        .about("Verify a username/password pair")
                        .arg(Arg::new("name").help("Username").required(true))
                        .arg(Arg::new("password").help("Password").required(true)),
                )
                .subcommand(
                    Command::new("customers")
                        .about("List the customer scopes of a user")
                        .arg(Arg::new("name").help("Username").required(true)),
                ),
        )
}

/// Build an editor for the table named in the matches, honoring the global
/// data directory and customer scope.
fn open_editor(matches: &ArgMatches) -> anyhow::Result<TableEditor> {
    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(|s| s.as_str())
        .unwrap_or("tables");
    let name = matches
        .get_one::<String>("table")
        .expect("table argument is required");
    let mut id = TableId::new(name)?;
    if let Some(customer) = matches.get_one::<String>("customer") {
        id = id.with_customer(customer);
    }
    Ok(TableEditor::new(TableStore::new(data_dir), id))
}

/// Print a success message and the resulting table.
fn report(outcome: &EditOutcome) {
    println!("{}", style(&outcome.message).green());
    let rendered = render::render_table(&outcome.table);
    if !rendered.is_empty() {
        print!("{rendered}");
    }
}

fn show_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let editor = open_editor(matches)?;
    let table = editor.table()?;
    match matches.get_one::<String>("output").map(|s| s.as_str()) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&table.to_json())?),
        _ => {
            if table.is_empty() {
                println!(
                    "The table '{}' is currently empty. Add columns to begin.",
                    editor.id().name()
                );
            } else {
                print!("{}", render::render_table(&table));
            }
        }
    }
    Ok(())
}

fn list_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(|s| s.as_str())
        .unwrap_or("tables");
    let customer = matches.get_one::<String>("customer").map(|s| s.as_str());
    let store = TableStore::new(data_dir);
    let names = store.list(customer)?;
    if names.is_empty() {
        println!("No tables stored yet.");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

/// Parse COLUMN=VALUE pairs from the command line.
fn parse_values(matches: &ArgMatches) -> anyhow::Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    if let Some(pairs) = matches.get_many::<String>("values") {
        for pair in pairs {
            let Some((column, value)) = pair.split_once('=') else {
                bail!("expected COLUMN=VALUE, got '{pair}'");
            };
            values.insert(column.trim().to_string(), value.to_string());
        }
    }
    Ok(values)
}

fn import_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let editor = open_editor(matches)?;
    let text = match matches.get_one::<String>("file") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read import file '{path}'"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read pasted data from stdin")?;
            buffer
        }
    };
    report(&editor.import(&text)?);
    Ok(())
}

fn user_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = matches
        .get_one::<String>("users-file")
        .map(|s| s.as_str())
        .unwrap_or("users.json");
    let creds = CredentialStore::new(path);
    match matches.subcommand() {
        Some(("set-password", sub)) => {
            let name = sub.get_one::<String>("name").expect("required");
            let password = sub.get_one::<String>("password").expect("required");
            creds.set_password(name, password)?;
            println!("{}", style(format!("Stored password for '{name}'.")).green());
        }
        Some(("add-customer", sub)) => {
            let name = sub.get_one::<String>("name").expect("required");
            let customer = sub.get_one::<String>("customer").expect("required");
            creds.add_customer(name, customer)?;
            println!(
                "{}",
                style(format!("Associated '{customer}' with '{name}'.")).green()
            );
        }
        Some(("check", sub)) => {
            let name = sub.get_one::<String>("name").expect("required");
            let password = sub.get_one::<String>("password").expect("required");
            if creds.authenticate(name, password)? {
                println!("ok");
            } else {
                bail!("invalid username or password");
            }
        }
        Some(("customers", sub)) => {
            let name = sub.get_one::<String>("name").expect("required");
            for customer in creds.customers(name)? {
                println!("{customer}");
            }
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("show", sub)) => show_handler(sub),
        Some(("list", sub)) => list_handler(sub),
        Some(("add-column", sub)) => {
            let editor = open_editor(sub)?;
            let name = sub.get_one::<String>("name").expect("required");
            report(&editor.add_column(name)?);
            Ok(())
        }
        Some(("add-row", sub)) => {
            let editor = open_editor(sub)?;
            let values = parse_values(sub)?;
            report(&editor.add_row(&values)?);
            Ok(())
        }
        Some(("rename-column", sub)) => {
            let editor = open_editor(sub)?;
            let old = sub.get_one::<String>("old").expect("required");
            let new = sub.get_one::<String>("new").expect("required");
            report(&editor.rename_column(old, new)?);
            Ok(())
        }
        Some(("delete-column", sub)) => {
            let editor = open_editor(sub)?;
            let name = sub.get_one::<String>("name").expect("required");
            report(&editor.delete_column(name)?);
            Ok(())
        }
        Some(("delete-rows", sub)) => {
            let editor = open_editor(sub)?;
            let start = *sub.get_one::<usize>("start").expect("required");
            let end = *sub.get_one::<usize>("end").expect("required");
            report(&editor.delete_rows(start, end)?);
            Ok(())
        }
        Some(("set-cell", sub)) => {
            let editor = open_editor(sub)?;
            let row = *sub.get_one::<usize>("row").expect("required");
            let column = sub.get_one::<String>("column").expect("required");
            let value = sub.get_one::<String>("value").expect("required");
            report(&editor.set_cell(row, column, value)?);
            Ok(())
        }
        Some(("import", sub)) => import_handler(sub),
        Some(("user", sub)) => user_handler(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
