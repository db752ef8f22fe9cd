pub mod booking_summary;
pub mod date_info;
pub mod datetime;
pub mod selection_state;
pub mod time_slot;
