//! Command line front end for the kmacros transforms.
//!
//! Every subcommand reads the text to transform from stdin and writes the
//! result to stdout. Notifications and errors go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Inline format arguments of the call on each line
//! echo 'println!("{} {}", a, b);' | kmacros inline --per-line
//!
//! # Strip comments from a markdown selection
//! kmacros --remove-comments-in-markdown true strip --markdown < notes.md
//!
//! # Duplicate the <li> whose tag holds byte 42
//! kmacros clone-element --cursor 42 < page.html
//! ```

use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info};

use kmacros::links::{DEFAULT_LINK_QUERY, LinkTemplate, markdown_links};
use kmacros::{Error, Settings, calc, comments, html, inline_macro_args};

#[derive(Parser)]
#[command(name = "kmacros")]
#[command(version)]
#[command(about = "Editor text transforms over stdin")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Strip comments from markdown documents too
    #[arg(
        long,
        global = true,
        env = "KMACROS_REMOVE_COMMENTS_IN_MARKDOWN",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    remove_comments_in_markdown: bool,

    /// Strip blank lines from markdown documents too
    #[arg(
        long,
        global = true,
        env = "KMACROS_REMOVE_WHITESPACE_IN_MARKDOWN",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    remove_whitespace_in_markdown: bool,

    /// Report on stderr what a command removed
    #[arg(
        long,
        global = true,
        env = "KMACROS_SHOW_NOTIFICATIONS",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    show_notifications: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Move positional format macro arguments into the format string
    Inline {
        /// Rewrite the first call of every line instead of the first call overall
        #[arg(long)]
        per_line: bool,
    },

    /// Turn each non-blank line into a markdown link
    Links {
        /// Prefix of every link target
        #[arg(long)]
        base_url: String,

        /// Suffix of every link target
        #[arg(long, default_value = DEFAULT_LINK_QUERY)]
        query: String,
    },

    /// Remove comments and blank lines
    Strip {
        /// Treat the input as a markdown document
        #[arg(long)]
        markdown: bool,
    },

    /// Evaluate the expression on the line, or flip its booleans
    Calc,

    /// Duplicate the HTML element whose opening tag holds the cursor
    CloneElement {
        /// Byte offset of the cursor in the input
        #[arg(long)]
        cursor: usize,

        /// Copy the element verbatim
        #[arg(long)]
        no_increment: bool,
    },

    /// Add one to every number
    Increment,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            remove_comments_in_markdown: self.remove_comments_in_markdown,
            remove_whitespace_in_markdown: self.remove_whitespace_in_markdown,
            show_notifications: self.show_notifications,
        }
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = cli.settings();
    debug!("settings: {settings:?}");

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = run(&cli.command, &settings, &input)?;

    io::stdout()
        .write_all(output.as_bytes())
        .context("failed to write stdout")?;
    Ok(())
}

fn run(command: &Commands, settings: &Settings, input: &str) -> Result<String> {
    match command {
        Commands::Inline { per_line: false } => Ok(inline_macro_args(input)),
        Commands::Inline { per_line: true } => {
            Ok(input.split_inclusive('\n').map(inline_macro_args).collect())
        }

        Commands::Links { base_url, query } => {
            let template = LinkTemplate::new(base_url.as_str()).with_query(query.as_str());
            let mut links = markdown_links(input, &template);
            if !links.is_empty() {
                links.push('\n');
            }
            Ok(links)
        }

        Commands::Strip { markdown } => {
            let stripped = comments::strip(input, settings.strip_options(*markdown));
            match stripped.notification() {
                Some(message) if settings.show_notifications => eprintln!("{message}"),
                Some(message) => info!("{message}"),
                None => {}
            }
            Ok(stripped.text)
        }

        Commands::Calc => {
            let (line, newline) = split_line_ending(input);
            match calc::apply_to_line(line) {
                Ok(result) => Ok(format!("{result}{newline}")),
                Err(Error::NoExpression) => bail!("No valid expression found."),
                Err(err) => bail!("Invalid expression: {err}"),
            }
        }

        Commands::CloneElement {
            cursor,
            no_increment,
        } => match html::clone_element(input, *cursor, !no_increment) {
            Ok(cloned) => Ok(cloned),
            Err(Error::NoElement) => bail!("No HTML element found at cursor position."),
            Err(err) => Err(err.into()),
        },

        Commands::Increment => Ok(html::increment_numbers(input)),
    }
}

/// Split a trailing `\n` or `\r\n` off a single-line selection.
fn split_line_ending(input: &str) -> (&str, &str) {
    let line = input.trim_end_matches(['\n', '\r']);
    (line, &input[line.len()..])
}
