use std::io;

use clap::{Args, Subcommand};
use orderdesk::products::{Product, ProductId};
use orderdesk_app::views;

use super::Desk;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a catalog product, or one more unit of it
    Add {
        /// Product identifier
        product: String,

        /// Units to add
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Take one unit off a line, removing it at zero
    Decrease {
        /// Product identifier
        product: String,
    },

    /// Set the quantity of a line; zero or less removes it
    Set {
        /// Product identifier
        product: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove {
        /// Product identifier
        product: String,
    },

    /// Show the cart
    Show,

    /// Empty the cart and forget the customer
    Discard,
}

pub(crate) async fn run(desk: &mut Desk, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add { product, count } => {
            let product = find_product(desk, &ProductId::parse(&product)).await?;

            if !product.in_stock() {
                println!("note: {} has no stock available", product.name);
            }

            for _ in 0..count {
                desk.draft.add(&product);
            }
        }
        CartSubcommand::Decrease { product } => {
            desk.draft.decrease(&ProductId::parse(&product));
        }
        CartSubcommand::Set { product, quantity } => {
            let id = ProductId::parse(&product);

            if desk.draft.cart().line(&id).is_none() && quantity > 0 {
                let product = find_product(desk, &id).await?;

                desk.draft.add(&product);
            }

            desk.draft.change_quantity(&id, quantity);
        }
        CartSubcommand::Remove { product } => {
            if !desk.draft.remove(&ProductId::parse(&product)) {
                return Err(format!("product {product} is not in the cart"));
            }
        }
        CartSubcommand::Show => {}
        CartSubcommand::Discard => desk.draft.discard(),
    }

    views::write_cart(
        &mut io::stdout().lock(),
        desk.draft.cart(),
        desk.draft.partner(),
        desk.context.currency,
    )
    .map_err(|error| format!("failed to write cart: {error}"))
}

async fn find_product(desk: &Desk, id: &ProductId) -> Result<Product, String> {
    let products = desk
        .context
        .catalog
        .ensure_loaded(false)
        .await
        .map_err(|error| error.to_string())?;

    products
        .iter()
        .find(|product| &product.id == id)
        .cloned()
        .ok_or_else(|| format!("product {id} not found in the catalog"))
}
