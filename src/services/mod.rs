pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod convert;
pub mod fulfilment_service;
pub mod lifecycle;
pub mod order_service;
pub mod settlement_service;
