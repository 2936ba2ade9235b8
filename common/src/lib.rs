pub mod logger;

pub use logger::{TraceId, init_logger, warn_if_slow};
