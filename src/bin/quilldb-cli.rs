//! Interactive SQL shell for quilldb

use quilldb::{Connection, Cursor, DbError, StoreConfig, TableStore};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DbError> {
    let args: Vec<String> = env::args().collect();
    let mut config = StoreConfig::default();

    for arg in &args[1..] {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("quilldb v{}", VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--ignore-constraint-violations" => {
                config = config.ignore_constraint_violations(true);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                return Ok(());
            }
        }
    }

    let conn = Connection::open(Arc::new(TableStore::new(config)));

    println!("quilldb v{} - in-memory SQL shell", VERSION);
    println!("Type a statement, or .quit to exit.");

    let stdin = io::stdin();
    loop {
        print!("quilldb> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ".quit" || line == ".exit" {
            break;
        }

        let is_select = line
            .split_whitespace()
            .next()
            .map(|w| w.eq_ignore_ascii_case("select"))
            .unwrap_or(false);

        let outcome = if is_select {
            conn.execute_reader(line, &[]).map(|mut cursor| {
                print_cursor(&mut cursor);
            })
        } else {
            conn.execute_non_query(line, &[]).map(|count| {
                println!("{} row(s) affected", count);
            })
        };

        if let Err(e) = outcome {
            eprintln!("{}", e);
        }
    }

    Ok(())
}

fn print_cursor(cursor: &mut Cursor) {
    let names: Vec<String> = (0..cursor.column_count())
        .map(|i| cursor.column_name(i).unwrap_or("?").to_string())
        .collect();
    println!("{}", names.join(" | "));

    let mut count = 0usize;
    while cursor.advance() {
        let cells: Vec<String> = (0..cursor.column_count())
            .map(|i| {
                cursor
                    .value(i)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| "?".to_string())
            })
            .collect();
        println!("{}", cells.join(" | "));
        count += 1;
    }
    println!("({} row(s))", count);
}

fn print_help() {
    println!(
        r#"quilldb v{} - in-memory SQL shell

Usage:
  quilldb-cli                                 start an interactive shell
  quilldb-cli --ignore-constraint-violations  drop duplicate-key inserts silently
  quilldb-cli --version | --help

Supported statements:
  CREATE TABLE name (col TYPE[(n[,m])], ..., [PRIMARY KEY (col, ...)])
  DROP TABLE name
  INSERT INTO name [(cols)] VALUES (vals)
  UPDATE name SET col = val, ... [WHERE ...]
  DELETE [FROM] name [WHERE ...]
  SELECT [DISTINCT] cols FROM name [WHERE ...] [ORDER BY cols]"#,
        VERSION
    );
}
