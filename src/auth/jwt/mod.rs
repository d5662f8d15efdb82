//! JWT token handling
//!
//! This module provides token pair issuance, verification, and refresh.

mod clock;
mod handler;
mod refresh;
pub mod types;
mod utils;


pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{Claims, TokenPair, TokenService, TokenStatus, TokenType};
