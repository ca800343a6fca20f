use crate::command_palette::CommandPalette;
use crate::core::ValidationError;
use crate::dates;
use crate::model::{Course, StudentRecord};
use crate::repository::{Outcome, StudentRepository};
use crate::results_grid::ResultsGrid;
use crate::search::SearchQuery;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// A `key=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

/// Represents a parsed shell command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Add(Vec<Assignment>),
    Update { id: i64, fields: Vec<Assignment> },
    Delete(i64),
    Search(Vec<Assignment>),
    List,
    Help,
    Quit,
    /// A known command with malformed arguments
    Invalid(String),
    Unknown(String),
}

/// Parses a user input string into a corresponding `Command`.
///
/// Commands start with a colon (`:`). Arguments are whitespace separated;
/// double quotes group a value that contains spaces.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let Some(body) = input.strip_prefix(':') else {
        return Command::Unknown(input.to_string());
    };
    let tokens = match tokenize(body) {
        Ok(tokens) => tokens,
        Err(msg) => return Command::Invalid(msg),
    };
    let Some((name, args)) = tokens.split_first() else {
        return Command::Unknown(input.to_string());
    };

    let parsed = match name.as_str() {
        "add" => parse_assignments(args).map(Command::Add),
        "update" => parse_id(args.first()).and_then(|id| {
            let fields = parse_assignments(&args[1..])?;
            if fields.is_empty() {
                return Err("Nothing to update: give at least one key=value".to_string());
            }
            Ok(Command::Update { id, fields })
        }),
        "delete" => parse_id(args.first()).map(Command::Delete),
        "search" => parse_assignments(args).map(Command::Search),
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Ok(Command::Unknown(input.to_string())),
    };
    parsed.unwrap_or_else(Command::Invalid)
}

fn tokenize(input: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_assignments(tokens: &[String]) -> Result<Vec<Assignment>, String> {
    tokens
        .iter()
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Assignment {
                key: key.to_lowercase(),
                value: value.to_string(),
            }),
            _ => Err(format!("Expected key=value, got '{}'", token)),
        })
        .collect()
}

fn parse_id(token: Option<&String>) -> Result<i64, String> {
    let token = token.ok_or_else(|| "Missing student id".to_string())?;
    token
        .parse()
        .map_err(|_| format!("Invalid student id '{}'", token))
}

/// Builds a new record from `:add` arguments. `curso` is mandatory.
pub fn build_record(fields: &[Assignment]) -> Result<StudentRecord, String> {
    let course = fields
        .iter()
        .rev()
        .find(|f| f.key == "curso")
        .ok_or_else(|| "Name, surname and course are required.".to_string())?;
    let course: Course = course
        .value
        .parse()
        .map_err(|e: ValidationError| e.to_string())?;

    let mut record = StudentRecord::new(String::new(), String::new(), course);
    apply_assignments(&mut record, fields)?;
    Ok(record)
}

/// Overlays `key=value` arguments onto a record.
///
/// `nascimento` accepts `DD/MM/YYYY` or ISO and is stored as ISO; anything
/// else is passed through for the validator to reject.
pub fn apply_assignments(record: &mut StudentRecord, fields: &[Assignment]) -> Result<(), String> {
    for Assignment { key, value } in fields {
        match key.as_str() {
            "nome" => record.nome = value.clone(),
            "sobrenome" => record.sobrenome = value.clone(),
            "telefone" => record.telefone = Some(value.clone()),
            "email" => record.email = Some(value.clone()),
            "cpf" => record.cpf = Some(value.clone()),
            "nascimento" | "data_nascimento" => {
                record.data_nascimento =
                    Some(dates::to_storage_format(value).unwrap_or_else(|| value.clone()));
            }
            "cidade" => record.cidade = value.clone(),
            "uf" => record.uf = value.clone(),
            "curso" => {
                record.curso = value
                    .parse()
                    .map_err(|e: ValidationError| e.to_string())?
            }
            other => return Err(format!("Unknown field '{}'", other)),
        }
    }
    Ok(())
}

/// Builds a search from `:search` arguments.
pub fn search_query(fields: &[Assignment]) -> Result<SearchQuery, String> {
    let mut field = None;
    let mut term = None;
    let mut sort = None;
    let mut dir = None;
    for Assignment { key, value } in fields {
        match key.as_str() {
            "field" => field = Some(value.as_str()),
            "term" => term = Some(value.as_str()),
            "sort" => sort = Some(value.as_str()),
            "dir" => dir = Some(value.as_str()),
            other => return Err(format!("Unknown search option '{}'", other)),
        }
    }
    // Searching for a term without naming a field searches by name.
    if term.is_some() && field.is_none() {
        field = Some("Nome");
    }
    Ok(SearchQuery::parse(field, term, sort, dir))
}

fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    if outcome.success {
        writeln!(out, "{}", outcome.message)
    } else {
        writeln!(out, "Error: {}", outcome.message)
    }
}

fn write_search<W: Write>(repo: &StudentRepository, query: &SearchQuery, out: &mut W) -> io::Result<()> {
    let result = repo.search(query);
    match result.rows {
        Some(rows) => {
            write!(out, "{}", ResultsGrid::from_students(&rows).render())?;
            writeln!(out, "\n{}", result.message)
        }
        None => writeln!(out, "Error: {}", result.message),
    }
}

/// Runs one command. Returns `false` when the shell should exit.
pub fn execute<W: Write>(
    repo: &StudentRepository,
    palette: &CommandPalette,
    command: Command,
    out: &mut W,
) -> io::Result<bool> {
    debug!("Executing {:?}", command);
    match command {
        Command::Add(fields) => match build_record(&fields) {
            Ok(record) => write_outcome(out, &repo.create(&record))?,
            Err(msg) => writeln!(out, "Error: {}", msg)?,
        },
        Command::Update { id, fields } => match repo.find_by_id(id) {
            Ok(Some(row)) => {
                let prepared = row.to_record().map_err(|e| e.to_string()).and_then(|mut record| {
                    apply_assignments(&mut record, &fields)?;
                    Ok(record)
                });
                match prepared {
                    Ok(record) => write_outcome(out, &repo.update(id, &record))?,
                    Err(msg) => writeln!(out, "Error: {}", msg)?,
                }
            }
            Ok(None) => write_outcome(out, &Outcome::failed("No student found with that ID."))?,
            Err(e) => writeln!(out, "Error: {}", e)?,
        },
        Command::Delete(id) => write_outcome(out, &repo.delete(id))?,
        Command::Search(fields) => match search_query(&fields) {
            Ok(query) => write_search(repo, &query, out)?,
            Err(msg) => writeln!(out, "Error: {}", msg)?,
        },
        Command::List => write_search(repo, &SearchQuery::all(), out)?,
        Command::Help => write!(out, "{}", palette.help_text())?,
        Command::Quit => return Ok(false),
        Command::Invalid(msg) => writeln!(out, "Error: {}", msg)?,
        Command::Unknown(input) => {
            writeln!(out, "Unknown command: {}", input)?;
            let query = input.trim_start_matches(':').split_whitespace().next().unwrap_or("");
            let suggestions = if query.is_empty() {
                Vec::new()
            } else {
                palette.filter_commands(query)
            };
            if suggestions.is_empty() {
                writeln!(out, "Type :help for the list of commands.")?;
            } else {
                writeln!(out, "Did you mean:")?;
                for suggestion in suggestions {
                    writeln!(out, "  :{} - {}", suggestion.name, suggestion.description)?;
                }
            }
        }
    }
    Ok(true)
}

/// Reads commands line by line until `:quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    repo: &StudentRepository,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    let palette = CommandPalette::new();
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() && !execute(repo, &palette, parse_command(&line), out)? {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

/// Runs the interactive shell on standard input and output.
pub fn run_repl(repo: &StudentRepository) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Welcome to the student registry! Type :help for commands, :quit to exit.")?;
    run_session(repo, stdin.lock(), &mut out)
}
