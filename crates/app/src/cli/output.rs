//! Table and money rendering for command output.

use canteen::{cart::CartLine, orders::Order, pricing::PricingPolicy};
use rust_decimal::Decimal;
use rusty_money::Money;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

pub(crate) fn money(policy: &PricingPolicy, amount: Decimal) -> String {
    Money::from_decimal(amount, policy.currency()).to_string()
}

/// Render rows under `header`, right-aligning columns from `numeric_from` on.
pub(crate) fn table<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
    numeric_from: usize,
) -> Table {
    let mut builder = Builder::default();
    builder.push_record(header.map(String::from));

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric_from..N), Alignment::right());

    table
}

pub(crate) fn cart_lines(policy: &PricingPolicy, lines: &[CartLine]) -> Table {
    table(
        ["ID", "Item", "Price", "Qty", "Total"],
        lines.iter().map(|line| {
            [
                line.id.to_string(),
                line.name.clone(),
                money(policy, line.price),
                line.quantity.to_string(),
                policy.line_total(line).to_string(),
            ]
        }),
        2,
    )
}

pub(crate) fn order_lines(policy: &PricingPolicy, order: &Order) -> Table {
    table(
        ["Item", "Qty", "Price", "Total"],
        order.items.iter().map(|line| {
            [
                line.menu_item.name.clone(),
                line.quantity.to_string(),
                money(policy, line.price),
                money(policy, line.total()),
            ]
        }),
        1,
    )
}

pub(crate) fn order_totals(policy: &PricingPolicy, order: &Order) {
    println!("Subtotal:  {}", money(policy, order.subtotal));
    println!("Tax:       {}", money(policy, order.tax));
    println!("Delivery:  {}", money(policy, order.delivery_charge));
    println!("Total:     {}", money(policy, order.total_amount));
}
