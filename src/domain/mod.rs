mod account;
mod money;
mod reward;
mod tier;
mod transaction;

pub use account::*;
pub use money::*;
pub use reward::*;
pub use tier::*;
pub use transaction::*;
