use std::io;

use clap::{Args, Subcommand};
use orderdesk::pricing::amount_in_minor_units;
use orderdesk_app::{
    domain::{
        orders::{OrderId, PaymentOffer, SubmissionOutcome},
        payments::PaymentLaunch,
    },
    views,
};
use rust_decimal::Decimal;
use tracing::warn;

use super::Desk;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Create a sale order from the draft
    Submit {
        /// Open the payment checkout as soon as the order is created
        #[arg(long)]
        pay: bool,
    },

    /// List the logged in employee's recent orders, newest first
    List {
        /// Orders to show
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Collect payment for an order created earlier
    Pay {
        /// Sale order identifier
        order: String,

        /// Amount to charge, in major currency units
        #[arg(long)]
        amount: Decimal,
    },

    /// Cancel a sale order
    Cancel {
        /// Sale order identifier
        order: String,
    },
}

pub(crate) async fn run(desk: &mut Desk, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Submit { pay } => submit(desk, pay).await,
        OrderSubcommand::List { limit } => {
            let session = desk
                .context
                .sessions
                .current()
                .map_err(|error| error.to_string())?;

            let orders = desk
                .context
                .orders
                .list_orders(&session, limit)
                .await
                .map_err(|error| format!("failed to load orders: {error}"))?;

            views::write_orders(&mut io::stdout().lock(), &orders, desk.context.currency)
                .map_err(|error| format!("failed to write orders: {error}"))
        }
        OrderSubcommand::Pay { order, amount } => {
            let minor = amount_in_minor_units(amount)
                .map_err(|error| format!("invalid amount: {error}"))?;

            let launch = desk
                .submitter
                .pay_order(OrderId::parse(&order), minor)
                .await
                .map_err(|error| format!("payment failed: {error}"))?;

            print_launch(&launch);

            Ok(())
        }
        OrderSubcommand::Cancel { order } => {
            let order_id = OrderId::parse(&order);

            desk.context
                .orders
                .cancel_order(&order_id)
                .await
                .map_err(|error| format!("failed to cancel order: {error}"))?;

            println!("order {order_id} cancelled");

            if let Err(error) = desk.context.catalog.refresh().await {
                warn!(%error, "failed to refresh products after cancellation");
            }

            Ok(())
        }
    }
}

async fn submit(desk: &mut Desk, pay: bool) -> Result<(), String> {
    let outcome = desk
        .submitter
        .submit(&mut desk.draft)
        .await
        .map_err(|error| format!("order not submitted: {error}"))?;

    match outcome {
        SubmissionOutcome::Completed { notice, .. } => {
            println!("{notice}");

            desk.submitter.dismiss();
        }
        SubmissionOutcome::PaymentOffered(offer) => {
            println!(
                "order {} created for {}",
                offer.order_id,
                offer.amount()
            );

            if pay {
                let launch = desk
                    .submitter
                    .pay_now()
                    .await
                    .map_err(|error| format!("payment failed: {error}"))?;

                print_launch(&launch);
            } else if let Some(offer) = desk.submitter.defer_payment() {
                print_pay_later(&offer);
            }
        }
    }

    Ok(())
}

fn print_launch(launch: &PaymentLaunch) {
    println!("payment reference: {}", launch.reference);
    println!("checkout: {}", launch.checkout_url);
}

fn print_pay_later(offer: &PaymentOffer) {
    println!(
        "pay later with: orderdesk order pay {} --amount {}",
        offer.order_id,
        offer.amount().amount()
    );
}
