//! Pool arithmetic.
//!
//! All money math runs on integral [`Amount`](crate::value_objects::Amount)s
//! through the checked helpers in [`rounding`]. Decimals appear only in the
//! reported spot price.

pub mod constant_product;
pub mod liquidity;
pub mod rounding;

pub use constant_product::{SwapQuote, calculate_k, calculate_spot_price, quote_swap};
pub use liquidity::{ExitQuote, JoinQuote, quote_exit, quote_join};
pub use rounding::{add, full_mul, mul_div_ceil, mul_div_floor, sub};
