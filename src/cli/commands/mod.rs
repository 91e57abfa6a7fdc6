pub mod clear;
pub mod tables;
