use clap::{Parser, Subcommand};
use orderdesk_app::{
    config::AppConfig,
    context::AppContext,
    domain::{drafts::DraftOrder, orders::OrderSubmitter},
    observability,
};

mod cart;
mod order;
mod partner;
mod products;
mod session;
mod shell;

#[derive(Debug, Parser)]
#[command(name = "orderdesk", about = "Sales order entry against the ERP", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: TopCommand,
}

#[derive(Debug, Subcommand)]
enum TopCommand {
    /// Read commands line by line from stdin, keeping the catalog loaded between them
    Shell,

    #[command(flatten)]
    Desk(Command),
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Log in, show or forget the employee the desk acts for
    Session(session::SessionCommand),

    /// List catalog products
    Products(products::ProductsArgs),

    /// Edit the draft cart
    Cart(cart::CartCommand),

    /// Find and choose the customer for the draft order
    Partner(partner::PartnerCommand),

    /// Submit, list, pay or cancel sale orders
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        let mut desk = Desk::new(context);

        match self.command {
            TopCommand::Shell => shell::run(&mut desk).await,
            TopCommand::Desk(command) => desk.run(command).await,
        }
    }
}

/// State shared by the commands of one process: the services, the draft and the submitter.
pub(crate) struct Desk {
    context: AppContext,
    draft: DraftOrder,
    submitter: OrderSubmitter,
}

impl Desk {
    fn new(context: AppContext) -> Self {
        Self {
            draft: context.restore_draft(),
            submitter: context.submitter(),
            context,
        }
    }

    async fn run(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::Session(command) => session::run(self, command),
            Command::Products(args) => products::run(self, args).await,
            Command::Cart(command) => cart::run(self, command).await,
            Command::Partner(command) => partner::run(self, command).await,
            Command::Order(command) => order::run(self, command).await,
        }
    }
}
