mod confirmation;

pub use confirmation::*;
