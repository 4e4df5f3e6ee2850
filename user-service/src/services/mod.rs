pub mod database;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoUserStore;
pub use error::UserServiceError;
pub use memory::InMemoryUserStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::UserStore;
