pub mod compute;
pub mod drivers;
pub mod entities;
