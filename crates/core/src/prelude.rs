//! Canteen prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    admin::{DashboardStats, OrderQuery},
    cart::{Cart, CartLine},
    checkout::{
        CheckoutField, CheckoutForm, FieldError, FieldErrors, OrderItemRequest, OrderRequest,
        OrderRequestError, PaymentMethod, ValidCheckout,
    },
    menu::{
        Category, MenuFilter, MenuItem, MenuItemId, MenuItemUpdate, MenuListing, MenuParseError,
        NewMenuItem, PriceBand,
    },
    orders::{Order, OrderCreated, OrderId, OrderLine, OrderStatus},
    payments::{
        CardDetails, PaymentChannel, PaymentDetailsError, PaymentRecord, PaymentRequest,
        TransactionId,
    },
    pricing::{PriceBreakdown, PricingPolicy},
};
