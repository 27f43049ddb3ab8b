pub mod audit_logs;
pub mod cart_items;
pub mod hotels;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod restaurants;
pub mod settlement_payments;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use hotels::Entity as Hotels;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use restaurants::Entity as Restaurants;
pub use settlement_payments::Entity as SettlementPayments;
pub use users::Entity as Users;
