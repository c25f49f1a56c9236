pub mod pallet_repo;
pub use pallet_repo::PalletRepository;
