pub mod compose;
pub mod frame;
pub mod pipeline;
pub mod trail;
