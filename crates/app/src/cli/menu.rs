use canteen::menu::{Category, MenuFilter, PriceBand};
use canteen_app::context::AppContext;
use clap::{Args, Subcommand};

use super::output::{money, table};

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
enum MenuSubcommand {
    /// List menu items
    List(ListMenuArgs),
}

#[derive(Debug, Args)]
struct ListMenuArgs {
    /// Only this category (breakfast, lunch, snacks, beverages, desserts)
    #[arg(long)]
    category: Option<Category>,

    /// Case-insensitive name search
    #[arg(long)]
    search: Option<String>,

    /// Price band (under50, 50to100, 100to200, above200)
    #[arg(long)]
    price: Option<PriceBand>,

    /// Hide sold out items
    #[arg(long)]
    available_only: bool,
}

pub(crate) async fn run(ctx: &AppContext, command: MenuCommand) -> Result<(), String> {
    match command.command {
        MenuSubcommand::List(args) => list(ctx, args).await,
    }
}

async fn list(ctx: &AppContext, args: ListMenuArgs) -> Result<(), String> {
    let filter = MenuFilter {
        category: args.category,
        search: args.search,
        price_band: args.price,
        available_only: args.available_only,
    };

    let items = ctx
        .menu()
        .browse(&filter)
        .await
        .map_err(|error| format!("failed to load menu: {error}"))?;

    if items.is_empty() {
        println!("no menu items match");
        return Ok(());
    }

    let rows = items.iter().map(|item| {
        [
            item.id.to_string(),
            item.name.clone(),
            item.category
                .map(Category::display_name)
                .unwrap_or_default()
                .to_string(),
            if item.is_available { "yes" } else { "sold out" }.to_string(),
            money(&ctx.pricing, item.price),
        ]
    });

    println!("{}", table(["ID", "Name", "Category", "Available", "Price"], rows, 4));

    Ok(())
}
