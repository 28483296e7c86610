//! Named remote operations, all dispatched through [`Connector::execute`](crate::Connector::execute).

mod compile;
mod metadata;
mod tooling;

pub use compile::CreatedComponent;
