pub mod add_relayer;
pub mod deposit;
pub mod initialize;
pub mod process_withdrawal;
pub mod register_token;
pub mod remove_relayer;
pub mod request_withdrawal;

pub use add_relayer::*;
pub use deposit::*;
pub use initialize::*;
pub use process_withdrawal::*;
pub use register_token::*;
pub use remove_relayer::*;
pub use request_withdrawal::*;
