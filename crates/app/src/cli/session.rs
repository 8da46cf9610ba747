use clap::{Args, Subcommand};
use orderdesk_app::session::{EmployeeId, SessionContext, SessionError};

use super::Desk;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Act as an ERP employee and warm the product catalog
    Login {
        /// ERP employee identifier
        #[arg(long)]
        employee_id: i64,
    },

    /// Show the employee currently logged in
    Show,

    /// Forget the logged in employee
    Logout,
}

pub(crate) fn run(desk: &mut Desk, command: SessionCommand) -> Result<(), String> {
    let storage = desk.context.storage.as_ref();

    match command.command {
        SessionSubcommand::Login { employee_id } => {
            SessionContext::new(EmployeeId::new(employee_id))
                .save(storage)
                .map_err(|error| format!("failed to log in: {error}"))?;

            println!("logged in as employee {employee_id}");

            desk.context.catalog.prefetch();
        }
        SessionSubcommand::Show => match SessionContext::load(storage) {
            Ok(session) => println!("employee_id: {}", session.employee_id()),
            Err(SessionError::NotLoggedIn) => println!("not logged in"),
            Err(error) => return Err(format!("failed to read session: {error}")),
        },
        SessionSubcommand::Logout => {
            SessionContext::clear(storage)
                .map_err(|error| format!("failed to log out: {error}"))?;

            println!("logged out");
        }
    }

    Ok(())
}
