use chrono::NaiveDate;

use crate::cli::context::CLIContext;
use crate::model::Contact;
use crate::ops::contact_ops::{
    self, AddressFields, AddressSpec, ContactInput, SharedEditChoice, UpdateOutcome,
};
use crate::ops::OrphanPolicy;
use crate::queries::contact_queries;
use crate::validation::trim_optional;

pub fn list(ctx: &CLIContext) {
    let contacts = contact_queries::find_for_list(&ctx.conn).unwrap_or_default();
    if contacts.is_empty() {
        println!("No contacts yet. Use 'add' to create one.");
        return;
    }

    println!("Contacts ({}):", contacts.len());
    for contact in &contacts {
        println!("  {}", contact.list_name());
    }
}

pub fn find(ctx: &CLIContext, args: &str) {
    let prefix = args.trim();
    if prefix.is_empty() {
        println!("Usage: find <last name prefix>");
        return;
    }

    let contacts =
        contact_queries::find_by_last_name_prefix(&ctx.conn, prefix).unwrap_or_default();
    if contacts.is_empty() {
        println!("No contacts with last name starting with '{}'", prefix);
        return;
    }
    for contact in &contacts {
        println!("  {}", contact.list_name());
    }
}

pub fn add(ctx: &CLIContext) {
    println!("Adding a new contact (press Enter to skip optional fields)");

    let Some(first_name) = ctx.prompt("First name: ") else {
        return;
    };
    let Some(last_name) = ctx.prompt("Last name (required): ") else {
        return;
    };

    let mut input = ContactInput {
        first_name,
        last_name,
        ..ContactInput::default()
    };
    if !prompt_optional_fields(ctx, &mut input) {
        return;
    }

    let Some(spec) = prompt_address_spec(ctx, None) else {
        return;
    };

    match contact_ops::create_contact(&ctx.conn, &input, &spec, OrphanPolicy::Destroy) {
        Ok(contact) => println!("Added {}", contact.full_name()),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn edit(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };

    println!("Editing {} (press Enter to keep a value)", contact.full_name());

    let mut input = ContactInput {
        prefix: contact.prefix.clone(),
        first_name: contact.first_name.clone(),
        middle_name: contact.middle_name.clone(),
        last_name: contact.last_name.clone(),
        birthday: contact.birthday,
        work_phone: contact.work_phone.clone(),
        cell_phone: contact.cell_phone.clone(),
        email: contact.email.clone(),
        website: contact.website.clone(),
    };

    let Some(first) = ctx.prompt_with_default("First name", &input.first_name) else {
        return;
    };
    input.first_name = first;
    let Some(last) = ctx.prompt_with_default("Last name", &input.last_name) else {
        return;
    };
    input.last_name = last;
    if !prompt_optional_fields(ctx, &mut input) {
        return;
    }

    let Some(spec) = prompt_address_spec(ctx, Some(&contact)) else {
        return;
    };

    match contact_ops::update_contact(
        &ctx.conn,
        &ctx.session_key,
        contact.id,
        &input,
        &spec,
        OrphanPolicy::Destroy,
    ) {
        Ok(UpdateOutcome::Saved { contact, .. }) => println!("Saved {}", contact.full_name()),
        Ok(UpdateOutcome::ConfirmationRequired { sharer_count, .. }) => {
            confirm_shared_edit(ctx, sharer_count);
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };

    let answer = ctx
        .prompt(&format!("Delete {}? (y/n): ", contact.full_name()))
        .unwrap_or_default();
    if !answer.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }

    match contact_ops::delete_contact(&ctx.conn, contact.id, OrphanPolicy::Destroy) {
        Ok(()) => println!("Deleted {}", contact.full_name()),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn remove_address(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };

    match contact_ops::remove_address(&ctx.conn, contact.id, OrphanPolicy::Destroy) {
        Ok(Some(_)) => println!("Removed address from {}", contact.full_name()),
        Ok(None) => println!("{} has no address.", contact.full_name()),
        Err(e) => ctx.print_error(&e),
    }
}

fn confirm_shared_edit(ctx: &CLIContext, sharer_count: usize) {
    println!("This address is shared by {} contacts.", sharer_count);
    let answer = ctx
        .prompt("Apply the change to all of them? (y = all, n = just this contact): ")
        .unwrap_or_default();

    let choice = if answer.eq_ignore_ascii_case("y") {
        SharedEditChoice::ApplyToAll
    } else {
        SharedEditChoice::PrivateCopy
    };

    match contact_ops::resolve_shared_edit(
        &ctx.conn,
        &ctx.session_key,
        choice,
        OrphanPolicy::Destroy,
    ) {
        Ok(contact) => println!("Saved {}", contact.full_name()),
        Err(e) => ctx.print_error(&e),
    }
}

/// Prompt for the seven optional personal fields. Returns false on EOF.
fn prompt_optional_fields(ctx: &CLIContext, input: &mut ContactInput) -> bool {
    macro_rules! text_field {
        ($label:expr, $slot:expr) => {
            match ctx.prompt_with_default($label, $slot.as_deref().unwrap_or("")) {
                Some(s) => $slot = trim_optional(Some(&s)),
                None => return false,
            }
        };
    }

    text_field!("Prefix", input.prefix);
    text_field!("Middle name", input.middle_name);

    let current = input.birthday.map(|d| d.to_string()).unwrap_or_default();
    match ctx.prompt_with_default("Birthday (YYYY-MM-DD)", &current) {
        Some(s) if s.is_empty() => input.birthday = None,
        Some(s) => match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            Ok(date) => input.birthday = Some(date),
            Err(_) => println!("Invalid date format, keeping previous value."),
        },
        None => return false,
    }

    text_field!("Work phone", input.work_phone);
    text_field!("Cell phone", input.cell_phone);
    text_field!("Email", input.email);
    text_field!("Website", input.website);
    true
}

/// Ask how (and whether) the address should change. Returns None on EOF.
fn prompt_address_spec(ctx: &CLIContext, contact: Option<&Contact>) -> Option<AddressSpec> {
    let has_address = contact.is_some_and(|c| c.address_id.is_some());
    let prompt = if has_address {
        "Address: (k)eep, (e)nter new values, (u)se another contact's: "
    } else {
        "Address: (s)kip, (e)nter values, (u)se another contact's: "
    };

    loop {
        let answer = ctx.prompt(prompt)?;
        match answer.to_lowercase().as_str() {
            "" | "k" | "s" => return Some(AddressSpec::None),
            "e" => return prompt_address_fields(ctx),
            "u" => {
                let query = ctx.prompt("Whose address? ")?;
                match ctx.find_contact(&query) {
                    Some(other) => return Some(AddressSpec::ExistingOf(other.id)),
                    None => continue,
                }
            }
            _ => println!("Please answer with one of the listed letters."),
        }
    }
}

fn prompt_address_fields(ctx: &CLIContext) -> Option<AddressSpec> {
    let address1 = ctx.prompt("Street: ")?;
    let address2 = ctx.prompt("Street line 2: ")?;
    let city = ctx.prompt("City: ")?;
    let state = ctx.prompt("State: ")?.to_uppercase();
    let zip = ctx.prompt("Zip: ")?;
    let home_phone = ctx.prompt("Home phone: ")?;
    Some(AddressSpec::Fields(AddressFields {
        address1,
        address2,
        city,
        state,
        zip,
        home_phone,
        ..AddressFields::default()
    }))
}
