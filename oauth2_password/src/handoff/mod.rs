mod errors;
mod store;
mod types;

pub use errors::HandoffError;
pub(crate) use store::HandoffCache;
