mod core;
mod google;
mod utils;

pub(crate) use core::OAuth2Broker;
pub(crate) use utils::append_handoff_params;
