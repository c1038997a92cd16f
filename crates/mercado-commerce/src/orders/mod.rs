//! Order ledger module.
//!
//! Orders are immutable snapshots of a cart at purchase time. Each line
//! records the seller it was bought from; status changes and cancellation
//! are the only mutations.

mod ledger;
mod number;
mod order;
mod seller;
mod shipping;

pub use ledger::{
    cancel_order, create_order, order_detail, orders_for_buyer, update_order_status,
};
pub use number::{random_order_number, unique_order_number};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, ShippingInfo};
pub use seller::{
    seller_order_detail, seller_orders, OrderWithSellerTotal, SellerDashboard, StatusCounts,
};
pub use shipping::CheckoutForm;
