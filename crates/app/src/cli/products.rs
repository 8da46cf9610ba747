use std::io;

use clap::Args;
use jiff::Timestamp;
use orderdesk_app::views;

use super::Desk;

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Fetch the catalog again even if the cached copy is still fresh
    #[arg(long)]
    refresh: bool,

    /// Only show products whose name or reference contains this text
    #[arg(long)]
    search: Option<String>,
}

pub(crate) async fn run(desk: &mut Desk, args: ProductsArgs) -> Result<(), String> {
    let products = desk
        .context
        .catalog
        .ensure_loaded(args.refresh)
        .await
        .map_err(|error| error.to_string())?;

    let query = args.search.unwrap_or_default();

    views::write_products(
        &mut io::stdout().lock(),
        products.iter().filter(|product| product.matches(&query)),
        desk.draft.cart(),
        desk.context.currency,
    )
    .map_err(|error| format!("failed to write products: {error}"))?;

    println!(
        "{}",
        views::catalog_age(desk.context.catalog.last_updated(), Timestamp::now())
    );

    Ok(())
}
