mod classifier;
mod dispatcher;
mod retry;
mod sessions;

pub use classifier::*;
pub use dispatcher::*;
pub use retry::*;
pub use sessions::*;
