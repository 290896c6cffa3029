use canteen::checkout::{CheckoutForm, PaymentMethod};
use canteen_app::{checkout::CheckoutOutcome, context::AppContext};
use clap::Args;

use super::output::money;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Table number
    #[arg(long)]
    table: String,

    /// Phone number, 10 digits
    #[arg(long)]
    phone: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Notes for the kitchen
    #[arg(long, default_value = "")]
    instructions: String,

    /// Payment method (cod, online)
    #[arg(long, default_value = "cod")]
    payment: PaymentMethod,
}

pub(crate) async fn run(ctx: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let form = CheckoutForm {
        customer_name: args.name,
        table_number: args.table,
        phone_number: args.phone,
        email: args.email,
        special_instructions: args.instructions,
        payment_method: args.payment,
    };

    let mut cart = ctx.cart();
    let outcome = ctx
        .checkout()
        .submit(&mut cart, &form)
        .await
        .map_err(|error| error.to_string())?;

    match outcome {
        CheckoutOutcome::Rejected(errors) => {
            for error in errors.iter() {
                eprintln!("{}: {}", error.field.as_str(), error.message);
            }

            Err("please fix the fields above and try again".to_string())
        }
        CheckoutOutcome::EmptyCart => Err("your cart is empty".to_string()),
        CheckoutOutcome::Confirmed(confirmation) => {
            println!("order placed: {}", confirmation.order_id);
            println!("total due on delivery: {}", money(&ctx.pricing, confirmation.total));
            println!("track it with: canteen track {}", confirmation.order_id);

            Ok(())
        }
        CheckoutOutcome::AwaitingPayment(handoff) => {
            println!("order placed: {}", handoff.order_id);
            println!("amount to pay: {}", money(&ctx.pricing, handoff.amount));
            println!(
                "pay with: canteen pay card --order-id {} --amount {} ...",
                handoff.order_id, handoff.amount
            );

            Ok(())
        }
    }
}
