pub mod expiration;
pub mod pallet_facets;
pub mod pallet_filters;
pub mod pallet_service;
pub mod pallet_summary;
