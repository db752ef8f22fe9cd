pub mod booking_panel;
pub mod booking_store;
pub mod interface;
