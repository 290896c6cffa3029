use canteen_app::{
    config::{ClientConfig, LoggingConfig},
    context::AppContext,
    observability,
};
use clap::{Parser, Subcommand};

mod admin;
mod cart;
mod checkout;
mod menu;
mod output;
mod pay;
mod track;

#[derive(Debug, Parser)]
#[command(name = "canteen", about = "Canteen ordering client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    client: ClientConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the menu
    Menu(menu::MenuCommand),

    /// Inspect and edit the cart
    Cart(cart::CartCommand),

    /// Place an order for the current cart
    Checkout(checkout::CheckoutArgs),

    /// Pay for an online order
    Pay(pay::PayCommand),

    /// Follow an order's status
    Track(track::TrackArgs),

    /// Admin console
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let ctx = AppContext::from_config(&self.client)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Menu(command) => menu::run(&ctx, command).await,
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Checkout(args) => checkout::run(&ctx, args).await,
            Commands::Pay(command) => pay::run(&ctx, command).await,
            Commands::Track(args) => track::run(&ctx, args).await,
            Commands::Admin(command) => admin::run(&ctx, command).await,
        }
    }
}
