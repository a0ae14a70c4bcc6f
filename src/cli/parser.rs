//! Command-line parsing for the line protocol.
//!
//! Each input line is one command. Tokens are separated by whitespace; a token
//! wrapped in double quotes may contain spaces, so `"Seattle WA"` is one city.

use crate::core::search::SearchQuery;
use crate::errors::{Error, Result};

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create <username> <password> <initial amount>`
    Create {
        /// New username
        username: String,
        /// New password
        password: String,
        /// Initial balance
        amount: i64,
    },
    /// `login <username> <password>`
    Login {
        /// Account to log in as
        username: String,
        /// Its password
        password: String,
    },
    /// `search <origin city> <destination city> <direct> <day> <num itineraries>`
    Search(SearchQuery),
    /// `book <itinerary id>`
    Book {
        /// Raw itinerary id as typed; negative ids are reported as unknown itineraries
        itinerary: i64,
    },
    /// `pay <reservation id>`
    Pay {
        /// Reservation to pay
        rid: i64,
    },
    /// `reservations`
    Reservations,
    /// `cancel <reservation id>`
    Cancel {
        /// Reservation to cancel
        rid: i64,
    },
    /// `quit`
    Quit,
}

/// Usage lines shown to clients.
pub const USAGE: &str = "\
 *** Please enter one of the following commands ***\n\
> create <username> <password> <initial amount>\n\
> login <username> <password>\n\
> search <origin city> <destination city> <direct> <day> <num itineraries>\n\
> book <itinerary id>\n\
> pay <reservation id>\n\
> reservations\n\
> cancel <reservation id>\n\
> quit\n";

/// Parses one input line.
pub fn parse(line: &str) -> Result<Command> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Err(invalid("Please provide a valid command"));
    };

    match (name.as_str(), args) {
        ("create", [username, password, amount]) => Ok(Command::Create {
            username: username.clone(),
            password: password.clone(),
            amount: number(amount, "create <username> <password> <initial amount>")?,
        }),
        ("login", [username, password]) => Ok(Command::Login {
            username: username.clone(),
            password: password.clone(),
        }),
        ("search", [origin, destination, direct, day, limit]) => {
            let usage = "search <origin city> <destination city> <direct> <day> <num itineraries>";
            Ok(Command::Search(SearchQuery {
                origin: origin.clone(),
                destination: destination.clone(),
                direct_only: number::<i64>(direct, usage)? == 1,
                day: number(day, usage)?,
                limit: number(limit, usage)?,
            }))
        }
        ("book", [id]) => Ok(Command::Book {
            itinerary: number(id, "book <itinerary id>")?,
        }),
        ("pay", [rid]) => Ok(Command::Pay {
            rid: number(rid, "pay <reservation id>")?,
        }),
        ("reservations", []) => Ok(Command::Reservations),
        ("cancel", [rid]) => Ok(Command::Cancel {
            rid: number(rid, "cancel <reservation id>")?,
        }),
        ("quit", []) => Ok(Command::Quit),
        ("create" | "login" | "search" | "book" | "pay" | "reservations" | "cancel" | "quit", _) => {
            Err(invalid(&format!("Wrong number of arguments for {name}")))
        }
        _ => Err(invalid("Please provide a valid command")),
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidCommand {
        message: message.to_string(),
    }
}

fn number<T: std::str::FromStr>(token: &str, usage: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| invalid(&format!("Expected a number in: {usage}")))
}

fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(ch) => token.push(ch),
                    None => return Err(invalid("Unterminated quote")),
                }
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}
