//! Store adapters implementing the push-based document-store traits.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

fn count_push() {
    metrics::counter!("rozgar_store_pushes_total").increment(1);
}
