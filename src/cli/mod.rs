pub mod context;
pub mod contact_commands;
pub mod address_commands;
pub mod group_commands;

use std::path::Path;

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{schema, staged_edit_repo};
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(db_path: &Path) {
    println!("Address Book");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        return;
    }

    // Abandoned confirmations from earlier sessions are dead weight.
    let _ = staged_edit_repo::clear_expired(&conn);

    let ctx = CLIContext::new(conn, Uuid::new_v4().to_string());
    repl_loop(&ctx);
}

fn repl_loop(ctx: &CLIContext) {
    loop {
        let Some(line) = ctx.read_line("> ") else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, args) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "exit" | "quit" | "q" => break,
            "list" => contact_commands::list(ctx),
            "find" => contact_commands::find(ctx, args),
            "add" => contact_commands::add(ctx),
            "edit" => contact_commands::edit(ctx, args),
            "delete" => contact_commands::delete(ctx, args),
            "remove-address" => contact_commands::remove_address(ctx, args),
            "addresses" => address_commands::list(ctx),
            "groups" => group_commands::list(ctx),
            "add-group" => group_commands::add(ctx, args),
            "delete-group" => group_commands::delete(ctx, args),
            "group-add" => group_commands::add_address(ctx, args),
            "group-remove" => group_commands::remove_address(ctx, args),
            "group-eligible" => group_commands::eligible(ctx),
            other => println!("Unknown command: {}. Type 'help' for commands.", other),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list                      List all contacts");
    println!("  find <prefix>             Find contacts by last name prefix");
    println!("  add                       Add a contact (and optionally an address)");
    println!("  edit <name>               Edit a contact and its address");
    println!("  delete <name>             Delete a contact");
    println!("  remove-address <name>     Detach a contact's address");
    println!("  addresses                 List all addresses (sorted)");
    println!("  groups                    List groups");
    println!("  add-group <name>          Create a group");
    println!("  delete-group <name>       Delete a group");
    println!("  group-add <group>, <contact>     Add a contact's address to a group");
    println!("  group-remove <group>, <contact>  Remove it again");
    println!("  group-eligible            List addresses that can join a group");
    println!("  exit                      Quit");
}
