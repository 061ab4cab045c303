pub mod connection;
pub mod dao;
pub mod entities;
pub mod memory;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::{
    ClassRepository, EnrollmentRepository, Repositories, StoreHealth, UserRepository,
};
