pub mod chrome;
pub mod driver;
pub mod error;

pub use chrome::{ChromeDriver, LaunchOptions};
pub use driver::Driver;
pub use error::DriverError;
