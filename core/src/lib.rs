#![no_std]

pub mod battery;
pub mod config;
pub mod cycle;
pub mod display;
pub mod net;
pub mod refresh;
pub mod request;
pub mod storage;

pub use embedded_raster as raster;

extern crate alloc;
