pub mod agent;
pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod request;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use request::PriceRequest;
