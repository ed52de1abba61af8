//! Sea-ORM backed account persistence.

pub mod entity;

mod accounts_sea_repo;

pub use accounts_sea_repo::SeaOrmAccountsRepository;
