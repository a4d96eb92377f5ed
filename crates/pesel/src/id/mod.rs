mod fragment;
mod pesel;
mod sex;

pub use fragment::*;
pub use pesel::*;
pub use sex::*;
