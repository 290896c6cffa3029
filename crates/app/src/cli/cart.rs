use canteen::menu::MenuItemId;
use canteen_app::{carts::CartStore, context::AppContext};
use clap::{Args, Subcommand};

use super::output::cart_lines;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show cart contents and totals
    Show,

    /// Add one unit of a menu item
    Add(ItemArgs),

    /// Remove a menu item
    Remove(ItemArgs),

    /// Set the quantity of a menu item; zero or less removes it
    Set(SetQuantityArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ItemArgs {
    /// Menu item id
    id: String,
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    /// Menu item id
    id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    let mut cart = ctx.cart();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let item = ctx
                .menu()
                .orderable(&MenuItemId::from(args.id.as_str()))
                .await
                .map_err(|error| format!("cannot add item: {error}"))?;

            cart.add(&item);
            println!("added {} to cart", item.name);
        }
        CartSubcommand::Remove(args) => {
            cart.remove(&MenuItemId::from(args.id.as_str()));
        }
        CartSubcommand::Set(args) => {
            cart.update_quantity(&MenuItemId::from(args.id.as_str()), args.quantity);
        }
        CartSubcommand::Clear => cart.clear(),
    }

    show(ctx, &cart);

    Ok(())
}

fn show(ctx: &AppContext, cart: &CartStore) {
    if cart.cart().is_empty() {
        println!("your cart is empty");
        return;
    }

    let breakdown = cart.breakdown(&ctx.pricing);

    println!("{}", cart_lines(&ctx.pricing, cart.lines()));
    println!("Items:     {}", cart.item_count());
    println!("Subtotal:  {}", breakdown.subtotal());
    println!("Tax:       {}", breakdown.tax());

    if breakdown.free_delivery() {
        println!("Delivery:  FREE");
    } else {
        println!("Delivery:  {}", breakdown.delivery_fee());
    }

    println!("Total:     {}", breakdown.total());
}
