use std::io;

use clap::{Args, Subcommand};
use orderdesk::partners::Partner;
use orderdesk_app::views;

use super::Desk;

#[derive(Debug, Args)]
pub(crate) struct PartnerCommand {
    #[command(subcommand)]
    command: PartnerSubcommand,
}

#[derive(Debug, Subcommand)]
enum PartnerSubcommand {
    /// Search customers by name, email, phone or document number
    Search(SearchPartnerArgs),

    /// Use this customer for the draft order
    Select(SelectPartnerArgs),

    /// Forget the selected customer
    Clear,
}

#[derive(Debug, Args)]
struct SearchPartnerArgs {
    /// Search text; empty lists the first customers
    query: Vec<String>,

    /// Use the result at this position (as numbered in the list) for the draft order
    #[arg(long)]
    pick: Option<usize>,
}

#[derive(Debug, Args)]
struct SelectPartnerArgs {
    /// ERP partner identifier
    #[arg(long)]
    id: i64,

    /// Customer display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Tax or identity document number
    #[arg(long)]
    vat: Option<String>,
}

pub(crate) async fn run(desk: &mut Desk, command: PartnerCommand) -> Result<(), String> {
    match command.command {
        PartnerSubcommand::Search(args) => search(desk, args).await?,
        PartnerSubcommand::Select(args) => {
            if args.name.trim().is_empty() {
                return Err("customer name cannot be empty".to_string());
            }

            println!("customer: {} ({})", args.name, args.id);

            desk.draft.select_partner(Partner {
                id: args.id,
                name: args.name,
                email: args.email,
                phone: args.phone,
                vat: args.vat,
            });
        }
        PartnerSubcommand::Clear => {
            desk.draft.clear_partner();

            println!("customer cleared");
        }
    }

    Ok(())
}

async fn search(desk: &mut Desk, args: SearchPartnerArgs) -> Result<(), String> {
    let session = desk
        .context
        .sessions
        .current()
        .map_err(|error| error.to_string())?;

    let partners = desk
        .context
        .partners
        .search_partners(&session, &args.query.join(" "))
        .await
        .map_err(|error| format!("customer search failed: {error}"))?;

    views::write_partners(&mut io::stdout().lock(), &partners)
        .map_err(|error| format!("failed to write customers: {error}"))?;

    let Some(position) = args.pick else {
        return Ok(());
    };

    let partner = position
        .checked_sub(1)
        .and_then(|index| partners.get(index))
        .cloned()
        .ok_or_else(|| format!("no customer at position {position}"))?;

    println!("customer: {} ({})", partner.name, partner.id);

    desk.draft.select_partner(partner);

    Ok(())
}
