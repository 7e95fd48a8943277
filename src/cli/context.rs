use std::io::{self, Write};

use rusqlite::Connection;

use crate::model::Contact;
use crate::queries::contact_queries;

pub struct CLIContext {
    pub conn: Connection,
    /// Staging key for deferred shared-address edits; one per REPL session.
    pub session_key: String,
}

impl CLIContext {
    pub fn new(conn: Connection, session_key: String) -> Self {
        Self { conn, session_key }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Prompt showing the current value; Enter keeps it.
    pub fn prompt_with_default(&self, label: &str, current: &str) -> Option<String> {
        let answer = self.prompt(&format!("{} [{}]: ", label, current))?;
        if answer.is_empty() {
            Some(current.to_string())
        } else {
            Some(answer)
        }
    }

    /// Find a contact by name query. Prints an error when the query misses
    /// or is ambiguous.
    pub fn find_contact(&self, args: &str) -> Option<Contact> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }

        let contacts = contact_queries::find_for_list(&self.conn).unwrap_or_default();
        let lower = query.to_lowercase();
        let matches: Vec<&Contact> = contacts
            .iter()
            .filter(|c| {
                c.last_name.to_lowercase().contains(&lower)
                    || format!("{} {}", c.first_name, c.last_name)
                        .to_lowercase()
                        .contains(&lower)
            })
            .collect();

        match matches.len() {
            0 => {
                println!("No contact found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                if let Some(exact) = matches.iter().find(|c| {
                    format!("{} {}", c.first_name, c.last_name).eq_ignore_ascii_case(query)
                }) {
                    return Some((*exact).clone());
                }
                println!("Multiple matches found:");
                for c in &matches {
                    println!("  {} {}", c.first_name, c.last_name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Print an error, expanding validation failures one per line.
    pub fn print_error(&self, e: &crate::error::AbookError) {
        match e.validation_errors() {
            Some(errors) => {
                for error in errors.iter() {
                    match &error.field {
                        Some(field) => println!("  {}: {}", field, error.message),
                        None => println!("  {}", error.message),
                    }
                }
            }
            None => println!("Error: {}", e),
        }
    }
}
