use std::io::{self, Write};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use super::{Command, Desk};

#[derive(Debug, Parser)]
#[command(
    name = "orderdesk",
    no_binary_name = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

pub(crate) async fn run(desk: &mut Desk) -> Result<(), String> {
    desk.context.catalog.prefetch();

    let mut lines = BufReader::new(stdin()).lines();

    loop {
        print!("orderdesk> ");
        io::stdout()
            .flush()
            .map_err(|error| format!("failed to write prompt: {error}"))?;

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|error| format!("failed to read input: {error}"))?
        else {
            break;
        };

        let words = match split_words(&line) {
            Ok(words) => words,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some(_) => {}
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                if let Err(error) = desk.run(parsed.command).await {
                    eprintln!("{error}");
                }
            }
            Err(error) => eprintln!("{error}"),
        }
    }

    Ok(())
}

/// Split a command line on whitespace, keeping quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(format!("unterminated {open} quote"));
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}
