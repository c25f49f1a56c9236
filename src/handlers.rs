pub mod pallets;
