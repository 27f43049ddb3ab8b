pub mod commission;
pub mod geo;
pub mod money;
pub mod order_status;
pub mod qr;
pub mod settlement;
