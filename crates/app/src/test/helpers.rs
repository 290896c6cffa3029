//! Builders for menu items and orders.

use canteen::{
    checkout::PaymentMethod,
    menu::{MenuItem, MenuItemId},
    orders::{Order, OrderId, OrderLine, OrderStatus, OrderedMenuItem},
};
use rust_decimal::Decimal;

pub(crate) fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
    MenuItem {
        id: MenuItemId::Int(id),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::from(price),
        category: None,
        is_available: true,
        image_url: None,
    }
}

pub(crate) fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        order_id: OrderId::new(id),
        customer_name: "Asha".to_string(),
        table_number: 4,
        phone_number: "9876543210".to_string(),
        email: None,
        payment_method: Some(PaymentMethod::Online),
        special_instructions: String::new(),
        status,
        items: vec![OrderLine {
            menu_item: OrderedMenuItem {
                id: Some(MenuItemId::Int(1)),
                name: "Paneer Roll".to_string(),
            },
            quantity: 2,
            price: Decimal::from(50),
        }],
        subtotal: Decimal::from(100),
        tax: Decimal::from(5),
        delivery_charge: Decimal::from(30),
        total_amount: Decimal::from(135),
        created_at: None,
        updated_at: None,
    }
}
