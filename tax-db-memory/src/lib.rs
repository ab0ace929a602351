mod factory;
mod repository;

pub use factory::MemoryRepositoryFactory;
pub use repository::MemoryRepository;
