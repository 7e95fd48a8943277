use crate::cli::context::CLIContext;
use crate::queries::address_queries;

pub fn list(ctx: &CLIContext) {
    let listings = match address_queries::find_for_list(&ctx.conn) {
        Ok(listings) => listings,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };

    if listings.is_empty() {
        println!("No addresses yet.");
        return;
    }

    println!("Addresses ({}):", listings.len());
    for listing in &listings {
        let addressee = listing.addressee_for_display();
        if listing.address.is_street_address_empty() {
            println!("  {}", addressee);
        } else {
            println!("  {} - {}", addressee, listing.address.mailing_address());
        }
    }
}
