pub mod pallet;
