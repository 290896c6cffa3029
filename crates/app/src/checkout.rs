//! Order submission.

use std::sync::Arc;

use canteen::{
    checkout::{CheckoutForm, FieldErrors, OrderRequest, OrderRequestError, PaymentMethod},
    orders::OrderId,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    api::{ApiError, CanteenApi},
    carts::CartStore,
};

/// Errors that prevent an order from being placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The backend rejected or never received the order; the cart is kept.
    #[error("failed to place order: {0}")]
    Api(#[from] ApiError),
}

/// An order the customer pays for on delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Backend-assigned order id
    pub order_id: OrderId,

    /// Backend-computed total
    pub total: Decimal,
}

/// What the payment step needs to charge an online order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHandoff {
    /// Backend-assigned order id
    pub order_id: OrderId,

    /// Amount to charge, as returned by the backend
    pub amount: Decimal,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// The form failed validation; nothing was sent.
    Rejected(FieldErrors),

    /// The cart was empty; nothing was sent.
    EmptyCart,

    /// Order placed for cash on delivery.
    Confirmed(OrderConfirmation),

    /// Order placed; continue to the payment step.
    AwaitingPayment(PaymentHandoff),
}

/// Turns a cart and a customer form into a placed order.
#[derive(Clone)]
pub struct CheckoutService {
    api: Arc<dyn CanteenApi>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(api: Arc<dyn CanteenApi>) -> Self {
        Self { api }
    }

    /// Validate `form`, submit the order and clear the cart once accepted.
    ///
    /// Validation failures and an empty cart are outcomes, not errors. The
    /// cart is cleared exactly once, and only after the backend accepted the
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails; the cart is left as-is.
    #[instrument(skip_all, fields(payment_method = %form.payment_method.as_str()))]
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let checkout = match form.validate() {
            Ok(checkout) => checkout,
            Err(errors) => {
                info!(fields = errors.len(), "checkout form rejected");
                return Ok(CheckoutOutcome::Rejected(errors));
            }
        };

        let request = match OrderRequest::new(&checkout, cart.cart()) {
            Ok(request) => request,
            Err(OrderRequestError::EmptyCart) => {
                info!("checkout attempted with an empty cart");
                return Ok(CheckoutOutcome::EmptyCart);
            }
        };

        let lines = request.items.len();
        let created = self.api.create_order(request).await.inspect_err(|error| {
            warn!(%error, "order submission failed");
        })?;

        cart.clear();

        info!(order_id = %created.order_id, lines, total = %created.total_amount, "order placed");

        Ok(match checkout.payment_method() {
            PaymentMethod::Online => CheckoutOutcome::AwaitingPayment(PaymentHandoff {
                order_id: created.order_id,
                amount: created.total_amount,
            }),
            PaymentMethod::CashOnDelivery => CheckoutOutcome::Confirmed(OrderConfirmation {
                order_id: created.order_id,
                total: created.total_amount,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use canteen::{
        checkout::{CheckoutField, OrderItemRequest},
        menu::MenuItemId,
        orders::OrderCreated,
    };
    use testresult::TestResult;

    use crate::{
        api::MockCanteenApi,
        storage::{CART_KEY, KeyValueStore, MemoryStore},
        test::helpers::menu_item,
    };

    use super::*;

    fn form(payment_method: PaymentMethod) -> CheckoutForm {
        CheckoutForm {
            customer_name: "Asha".to_string(),
            table_number: "4".to_string(),
            phone_number: "98765 43210".to_string(),
            email: String::new(),
            special_instructions: "Less spicy".to_string(),
            payment_method,
        }
    }

    fn filled_cart(storage: Arc<MemoryStore>) -> CartStore {
        let mut cart = CartStore::open(storage);
        let roll = menu_item(1, "Paneer Roll", 50);

        cart.add(&roll);
        cart.add(&roll);
        cart.add(&menu_item(2, "Chai", 30));

        cart
    }

    #[tokio::test]
    async fn online_order_hands_off_backend_total_and_clears_cart() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = filled_cart(storage.clone());
        let mut api = MockCanteenApi::new();

        api.expect_create_order()
            .once()
            .withf(|request| {
                request.payment_method == PaymentMethod::Online
                    && request.email.is_none()
                    && request.phone_number == "98765 43210"
                    && request.items
                        == [
                            OrderItemRequest {
                                menu_item_id: MenuItemId::Int(1),
                                quantity: 2,
                            },
                            OrderItemRequest {
                                menu_item_id: MenuItemId::Int(2),
                                quantity: 1,
                            },
                        ]
            })
            .return_once(|_| {
                Ok(OrderCreated {
                    order_id: OrderId::new("ORD-42"),
                    total_amount: Decimal::from(172),
                })
            });

        let service = CheckoutService::new(Arc::new(api));
        let outcome = service
            .submit(&mut cart, &form(PaymentMethod::Online))
            .await?;

        assert_eq!(
            outcome,
            CheckoutOutcome::AwaitingPayment(PaymentHandoff {
                order_id: OrderId::new("ORD-42"),
                amount: Decimal::from(172),
            })
        );
        assert!(cart.cart().is_empty());
        assert_eq!(storage.get(CART_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[tokio::test]
    async fn cash_order_is_confirmed() -> TestResult {
        let mut cart = filled_cart(Arc::new(MemoryStore::new()));
        let mut api = MockCanteenApi::new();

        api.expect_create_order().once().return_once(|_| {
            Ok(OrderCreated {
                order_id: OrderId::new("7"),
                total_amount: Decimal::from(167),
            })
        });

        let outcome = CheckoutService::new(Arc::new(api))
            .submit(&mut cart, &form(PaymentMethod::CashOnDelivery))
            .await?;

        assert_eq!(
            outcome,
            CheckoutOutcome::Confirmed(OrderConfirmation {
                order_id: OrderId::new("7"),
                total: Decimal::from(167),
            })
        );
        assert!(cart.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() -> TestResult {
        let mut cart = filled_cart(Arc::new(MemoryStore::new()));
        let mut api = MockCanteenApi::new();
        api.expect_create_order().never();

        let mut bad = form(PaymentMethod::Online);
        bad.phone_number = "12345".to_string();
        bad.customer_name = "   ".to_string();

        let outcome = CheckoutService::new(Arc::new(api))
            .submit(&mut cart, &bad)
            .await?;

        let errors = match outcome {
            CheckoutOutcome::Rejected(errors) => errors,
            other => panic!("expected rejection, got {other:?}"),
        };

        assert_eq!(errors.get(CheckoutField::CustomerName), Some("Name is required"));
        assert_eq!(
            errors.get(CheckoutField::PhoneNumber),
            Some("Phone number must be 10 digits")
        );
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_sends_nothing() -> TestResult {
        let mut cart = CartStore::open(Arc::new(MemoryStore::new()));
        let mut api = MockCanteenApi::new();
        api.expect_create_order().never();

        let outcome = CheckoutService::new(Arc::new(api))
            .submit(&mut cart, &form(PaymentMethod::CashOnDelivery))
            .await?;

        assert_eq!(outcome, CheckoutOutcome::EmptyCart);

        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_cart() {
        let mut cart = filled_cart(Arc::new(MemoryStore::new()));
        let mut api = MockCanteenApi::new();

        api.expect_create_order()
            .once()
            .return_once(|_| Err(ApiError::from_response(400, br#"{"detail":"Kitchen closed"}"#)));

        let result = CheckoutService::new(Arc::new(api))
            .submit(&mut cart, &form(PaymentMethod::Online))
            .await;

        assert!(
            matches!(&result, Err(CheckoutError::Api(ApiError::Status { message, .. })) if message == "Kitchen closed"),
            "expected api error, got {result:?}"
        );
        assert_eq!(cart.item_count(), 3);
    }
}
