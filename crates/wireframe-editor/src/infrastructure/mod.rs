//! Infrastructure layer: adapters between the application and the outside
//! world (pointer capture, storage backends, configuration, notifications).

pub mod notify;
pub mod pointer_capture;
pub mod storage;
