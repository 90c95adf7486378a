pub mod logger;
pub mod string;

pub use logger::init_logging;
pub use string::sanitize_symbol;
