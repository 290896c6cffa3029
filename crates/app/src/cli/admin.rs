use canteen::{
    admin::OrderQuery,
    checkout::PaymentMethod,
    menu::{Category, MenuItemId, NewMenuItem},
    orders::{OrderId, OrderStatus},
};
use canteen_app::{admin::AdminService, context::AppContext};
use clap::{Args, Subcommand};
use jiff::civil::Date;
use rust_decimal::Decimal;
use zeroize::Zeroizing;

use super::output::{money, table};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Log in and keep the session token
    Login(LoginArgs),

    /// Forget the session token
    Logout,

    /// Show order and revenue figures
    Dashboard,

    /// List orders
    Orders(OrdersArgs),

    /// Move an order to a new status
    SetStatus(SetStatusArgs),

    /// Add a menu item
    MenuAdd(MenuAddArgs),

    /// Flip a menu item between available and sold out
    MenuToggle(MenuItemArgs),

    /// Delete a menu item
    MenuDelete(MenuItemArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Admin username
    #[arg(long)]
    username: String,

    /// Admin password
    #[arg(long, env = "CANTEEN_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct OrdersArgs {
    /// Only orders in this status
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Only orders placed on this day (YYYY-MM-DD)
    #[arg(long)]
    date: Option<Date>,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    /// Order id
    order_id: String,

    /// New status (pending, confirmed, preparing, ready, completed, cancelled)
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct MenuAddArgs {
    /// Item name
    #[arg(long)]
    name: String,

    /// Item description
    #[arg(long)]
    description: String,

    /// Price
    #[arg(long)]
    price: Decimal,

    /// Category
    #[arg(long, default_value = "breakfast")]
    category: Category,

    /// Image URL
    #[arg(long, default_value = "")]
    image_url: String,

    /// Create the item as sold out
    #[arg(long)]
    unavailable: bool,
}

#[derive(Debug, Args)]
struct MenuItemArgs {
    /// Menu item id
    id: String,
}

pub(crate) async fn run(ctx: &AppContext, command: AdminCommand) -> Result<(), String> {
    let admin = ctx.admin();

    match command.command {
        AdminSubcommand::Login(args) => {
            admin
                .login(&args.username, Zeroizing::new(args.password))
                .await
                .map_err(|error| format!("login failed: {error}"))?;
            println!("logged in as {}", args.username);
        }
        AdminSubcommand::Logout => {
            admin.logout().map_err(|error| error.to_string())?;
            println!("logged out");
        }
        command => {
            require_login(&admin)?;
            run_authenticated(ctx, &admin, command).await?;
        }
    }

    Ok(())
}

fn require_login(admin: &AdminService) -> Result<(), String> {
    if admin.is_logged_in() {
        Ok(())
    } else {
        Err("not logged in; run `canteen admin login` first".to_string())
    }
}

async fn run_authenticated(
    ctx: &AppContext,
    admin: &AdminService,
    command: AdminSubcommand,
) -> Result<(), String> {
    match command {
        AdminSubcommand::Dashboard => {
            let stats = admin.dashboard().await.map_err(|error| error.to_string())?;

            println!("Total orders:      {}", stats.total_orders);
            println!("Total revenue:     {}", money(&ctx.pricing, stats.total_revenue));
            println!("Pending orders:    {}", stats.pending_orders);
            println!("Completed orders:  {}", stats.completed_orders);
        }
        AdminSubcommand::Orders(args) => {
            let orders = admin
                .orders(OrderQuery {
                    status: args.status,
                    date: args.date,
                })
                .await
                .map_err(|error| error.to_string())?;

            let rows = orders.iter().map(|order| {
                [
                    order.order_id.to_string(),
                    order.customer_name.clone(),
                    order.table_number.to_string(),
                    order.status.label().to_string(),
                    order
                        .payment_method
                        .map_or("-", PaymentMethod::label)
                        .to_string(),
                    money(&ctx.pricing, order.total_amount),
                ]
            });

            println!(
                "{}",
                table(
                    ["Order", "Customer", "Table", "Status", "Payment", "Total"],
                    rows,
                    5
                )
            );
        }
        AdminSubcommand::SetStatus(args) => {
            let order = admin
                .set_status(OrderId::new(args.order_id), args.status)
                .await
                .map_err(|error| error.to_string())?;

            println!("order {} is now {}", order.order_id, order.status.label());
        }
        AdminSubcommand::MenuAdd(args) => {
            let item = admin
                .add_menu_item(NewMenuItem {
                    name: args.name,
                    description: args.description,
                    price: args.price,
                    category: args.category,
                    is_available: !args.unavailable,
                    image_url: args.image_url,
                })
                .await
                .map_err(|error| error.to_string())?;

            println!("created menu item {} ({})", item.id, item.name);
        }
        AdminSubcommand::MenuToggle(args) => {
            let item = admin
                .toggle_availability(&MenuItemId::from(args.id.as_str()))
                .await
                .map_err(|error| error.to_string())?;

            let state = if item.is_available { "available" } else { "sold out" };
            println!("{} is now {state}", item.name);
        }
        AdminSubcommand::MenuDelete(args) => {
            admin
                .delete_menu_item(MenuItemId::from(args.id.as_str()))
                .await
                .map_err(|error| error.to_string())?;

            println!("deleted menu item {}", args.id);
        }
        AdminSubcommand::Login(_) | AdminSubcommand::Logout => {}
    }

    Ok(())
}
