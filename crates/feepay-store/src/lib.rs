pub mod memory;
pub mod postgres;

pub use memory::InMemoryPaymentStore;
pub use postgres::PgPaymentStore;
