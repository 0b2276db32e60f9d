pub mod subject;
pub mod token;
pub mod unit_of_work;

pub use subject::{InMemorySubjectDirectory, SubjectResolver};
pub use token::{InMemoryTokenStore, MemoryUnitOfWork, TokenStore};
pub use unit_of_work::UnitOfWorkProvider;
