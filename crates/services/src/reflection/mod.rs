mod workflow;

pub use workflow::{DispatchResult, ReflectionLoop};
