//! Line commands understood by the terminal front end.

use thiserror::Error;

use crate::domain::types::{Category, TypeConstraintError};
use crate::forms::member::MemberForm;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid page number: {0}")]
    InvalidPage(String),

    #[error(transparent)]
    InvalidCategory(#[from] TypeConstraintError),
}

#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    /// Any line not starting with `:` replaces the search text.
    Search(String),
    Category(Option<Category>),
    Page(usize),
    Next,
    Previous,
    Refresh,
    Add(MemberForm),
    Edit { key: String, form: MemberForm },
    Quit,
}

/// `fullName;phone;category;dob[;bloodGroup[;address]]` for the record `id_no`.
fn parse_details(id_no: String, fields: &str) -> Result<MemberForm, ConsoleError> {
    let mut parts = fields.split(';').map(str::trim);
    let mut next = |name| parts.next().map(str::to_string).ok_or(ConsoleError::MissingArgument(name));

    Ok(MemberForm {
        id_no,
        full_name: next("full name")?,
        phone_number: next("phone number")?,
        category: next("category")?,
        dob: next("date of birth")?,
        blood_group: next("blood group").unwrap_or_default(),
        present_address: next("present address").unwrap_or_default(),
    })
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ConsoleCommand::Search(line.to_string()));
    };

    let (name, args) = command
        .split_once(char::is_whitespace)
        .map(|(name, args)| (name, args.trim()))
        .unwrap_or((command.trim(), ""));

    match name {
        "category" => Ok(ConsoleCommand::Category(Category::parse_filter(args)?)),
        "page" => {
            if args.is_empty() {
                return Err(ConsoleError::MissingArgument("page number"));
            }
            args.parse()
                .map(ConsoleCommand::Page)
                .map_err(|_| ConsoleError::InvalidPage(args.to_string()))
        }
        "next" => Ok(ConsoleCommand::Next),
        "prev" => Ok(ConsoleCommand::Previous),
        "refresh" => Ok(ConsoleCommand::Refresh),
        "quit" => Ok(ConsoleCommand::Quit),
        "add" => {
            let (id_no, fields) = args.split_once(';').unwrap_or((args, ""));
            if id_no.trim().is_empty() {
                return Err(ConsoleError::MissingArgument("id number"));
            }
            parse_details(id_no.trim().to_string(), fields).map(ConsoleCommand::Add)
        }
        // Updates never change the id number, so the key stands in for it.
        "edit" => {
            let (key, fields) = args
                .split_once(';')
                .ok_or(ConsoleError::MissingArgument("record key"))?;
            let key = key.trim().to_string();
            Ok(ConsoleCommand::Edit {
                form: parse_details(key.clone(), fields)?,
                key,
            })
        }
        other => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}
