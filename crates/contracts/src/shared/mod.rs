pub mod data_grid;
