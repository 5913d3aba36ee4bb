mod literal;
mod value;

pub use literal::{ArgKey, Args, Literal};
pub use value::{LazyFn, LazyValue, Value, Values};
