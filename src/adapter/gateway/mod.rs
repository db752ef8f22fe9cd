pub mod clock;
pub mod success_url;
pub mod yaml;
