pub mod athletes;
pub mod clubs;
pub mod competitions;
pub mod events;
pub mod races;
pub mod rankings;
