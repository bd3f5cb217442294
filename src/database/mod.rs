pub mod connection;
pub mod operations;

pub use connection::create_ssl_connector;
pub use operations::{init_schema, read_all, read_latest, read_rain_window, store_record};
