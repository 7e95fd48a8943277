use crate::cli::context::CLIContext;
use crate::db::group_repo;
use crate::ops::group_ops;
use crate::queries::address_queries;

pub fn list(ctx: &CLIContext) {
    let groups = group_repo::find_all(&ctx.conn).unwrap_or_default();
    if groups.is_empty() {
        println!("No groups yet. Use 'add-group <name>' to create one.");
        return;
    }

    for group in &groups {
        println!("  {} ({} addresses)", group.name, group.address_ids.len());
    }
}

pub fn add(ctx: &CLIContext, args: &str) {
    match group_ops::create_group(&ctx.conn, args) {
        Ok(group) => println!("Created group '{}'", group.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let Some(group) = find_group(ctx, args) else {
        return;
    };

    match group_ops::delete_group(&ctx.conn, group.id) {
        Ok(()) => println!("Deleted group '{}'", group.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Add a contact's address to a group: `group-add <group>, <contact>`.
pub fn add_address(ctx: &CLIContext, args: &str) {
    let Some((group_name, contact_query)) = args.split_once(',') else {
        println!("Usage: group-add <group>, <contact>");
        return;
    };

    let Some(group) = find_group(ctx, group_name) else {
        return;
    };
    let Some(contact) = ctx.find_contact(contact_query) else {
        return;
    };
    let Some(address_id) = contact.address_id else {
        println!("{} has no address.", contact.full_name());
        return;
    };

    match group_ops::add_address(&ctx.conn, group.id, address_id) {
        Ok(group) => println!("Added to '{}'", group.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn remove_address(ctx: &CLIContext, args: &str) {
    let Some((group_name, contact_query)) = args.split_once(',') else {
        println!("Usage: group-remove <group>, <contact>");
        return;
    };

    let Some(group) = find_group(ctx, group_name) else {
        return;
    };
    let Some(contact) = ctx.find_contact(contact_query) else {
        return;
    };
    let Some(address_id) = contact.address_id else {
        println!("{} has no address.", contact.full_name());
        return;
    };

    match group_ops::remove_address(&ctx.conn, group.id, address_id) {
        Ok(group) => println!("Removed from '{}'", group.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// List the addresses that could be added to a group.
pub fn eligible(ctx: &CLIContext) {
    let addresses = address_queries::eligible_for_group(&ctx.conn).unwrap_or_default();
    if addresses.is_empty() {
        println!("No group-eligible addresses.");
        return;
    }
    for address in &addresses {
        println!("  {}", address.mailing_address());
    }
}

fn find_group(ctx: &CLIContext, query: &str) -> Option<crate::model::Group> {
    let name = query.trim();
    if name.is_empty() {
        println!("Group name required.");
        return None;
    }
    match group_repo::find_by_name(&ctx.conn, name) {
        Ok(Some(group)) => Some(group),
        Ok(None) => {
            println!("No group named '{}'", name);
            None
        }
        Err(e) => {
            ctx.print_error(&e);
            None
        }
    }
}
