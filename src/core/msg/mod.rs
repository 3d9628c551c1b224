mod reply;
mod request;
mod rpc;

pub use reply::*;
pub use request::*;
pub use rpc::*;
