pub mod app_config;
pub mod offer_repo;
pub mod patient_repo;
pub mod seed;

pub use offer_repo::InMemoryOfferRepository;
pub use patient_repo::InMemoryPatientDirectory;
