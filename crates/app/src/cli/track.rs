use canteen::orders::{Order, OrderId, OrderStatus};
use canteen_app::{context::AppContext, tracking::TrackingError};
use clap::Args;
use tokio::signal;

use super::output::{order_lines, order_totals};

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order id
    order_id: String,

    /// Print the current status and exit instead of following updates
    #[arg(long)]
    once: bool,
}

pub(crate) async fn run(ctx: &AppContext, args: TrackArgs) -> Result<(), String> {
    let mut handle = ctx
        .tracker()
        .start(OrderId::new(args.order_id))
        .await
        .map_err(|error| error.to_string())?;

    let order = handle.current();
    println!("order {} for table {}", order.order_id, order.table_number);
    println!("{}", order_lines(&ctx.pricing, &order));
    order_totals(&ctx.pricing, &order);
    print_progress(&order);

    if args.once || !handle.is_polling() {
        return Ok(());
    }

    let mut last = order.status;

    loop {
        tokio::select! {
            update = handle.changed() => match update {
                Ok(order) => {
                    if order.status != last {
                        last = order.status;
                        print_progress(&order);
                    }
                }
                Err(TrackingError::Stopped) => break,
                Err(error) => return Err(error.to_string()),
            },
            result = signal::ctrl_c() => {
                result.map_err(|error| format!("failed to install Ctrl+C handler: {error}"))?;
                tracing::info!("ctrl_c signal received");
                break;
            }
        }
    }

    handle.stop();

    Ok(())
}

fn print_progress(order: &Order) {
    let Some(stage) = order.status.stage() else {
        println!("status: {}", order.status.label());
        return;
    };

    let steps: Vec<String> = OrderStatus::PROGRESSION
        .iter()
        .enumerate()
        .map(|(index, status)| {
            let mark = if index <= stage { 'x' } else { ' ' };
            format!("[{mark}] {}", status.label())
        })
        .collect();

    println!("{}", steps.join("  "));
}
