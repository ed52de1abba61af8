pub mod entity;

mod items_sea_repo;

pub use items_sea_repo::SeaOrmItemsRepository;

#[cfg(test)]
mod items_repo_test;
