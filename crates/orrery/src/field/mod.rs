pub mod potential;
