use canteen::{orders::OrderId, payments::CardDetails};
use canteen_app::{
    checkout::PaymentHandoff,
    context::AppContext,
    payments::{PaymentInput, PaymentReceipt},
};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use super::output::money;

#[derive(Debug, Args)]
pub(crate) struct PayCommand {
    #[command(subcommand)]
    method: PaySubcommand,
}

#[derive(Debug, Subcommand)]
enum PaySubcommand {
    /// Pay by card
    Card(CardArgs),

    /// Pay by UPI
    Upi(UpiArgs),
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order id returned by checkout
    #[arg(long)]
    order_id: String,

    /// Amount returned by checkout
    #[arg(long)]
    amount: Decimal,
}

#[derive(Debug, Args)]
struct CardArgs {
    #[command(flatten)]
    order: OrderArgs,

    /// Card number
    #[arg(long)]
    number: String,

    /// Name on the card
    #[arg(long)]
    holder: String,

    /// Expiry, MM/YY
    #[arg(long)]
    expiry: String,

    /// Security code
    #[arg(long, env = "CANTEEN_CARD_CVV", hide_env_values = true)]
    cvv: String,
}

#[derive(Debug, Args)]
struct UpiArgs {
    #[command(flatten)]
    order: OrderArgs,

    /// UPI id, e.g. name@bank
    #[arg(long)]
    upi_id: String,
}

impl From<OrderArgs> for PaymentHandoff {
    fn from(args: OrderArgs) -> Self {
        Self {
            order_id: OrderId::new(args.order_id),
            amount: args.amount,
        }
    }
}

pub(crate) async fn run(ctx: &AppContext, command: PayCommand) -> Result<(), String> {
    let (handoff, input) = match command.method {
        PaySubcommand::Card(args) => (
            PaymentHandoff::from(args.order),
            PaymentInput::Card(CardDetails::from_input(
                &args.number,
                &args.holder,
                &args.expiry,
                &args.cvv,
            )),
        ),
        PaySubcommand::Upi(args) => (
            PaymentHandoff::from(args.order),
            PaymentInput::Upi(args.upi_id),
        ),
    };

    let PaymentReceipt { transaction_id, .. } = ctx
        .payments()
        .pay(&handoff, &input)
        .await
        .map_err(|error| error.to_string())?;

    println!("payment successful");
    println!("transaction: {transaction_id}");
    println!("amount paid: {}", money(&ctx.pricing, handoff.amount));
    println!("track it with: canteen track {}", handoff.order_id);

    Ok(())
}
