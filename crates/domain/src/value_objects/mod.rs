pub mod amount;
pub mod asset_amount;
pub mod attached;
pub mod denom;

pub use amount::Amount;
pub use asset_amount::AssetAmount;
pub use attached::AttachedAssets;
pub use denom::Denom;
