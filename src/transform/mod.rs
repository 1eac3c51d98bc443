pub mod currency;
pub mod genre;
pub mod title;
