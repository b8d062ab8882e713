pub mod image;
pub mod lookup;
pub mod owner;
pub mod product;

mod wire;
