pub(crate) mod cache;
pub(crate) mod error;
pub(crate) mod http;
pub(crate) mod math;
pub(crate) mod serde;
