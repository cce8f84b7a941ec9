// Core modules implementing argument encoding, process execution, and error modeling.
pub mod encode;
pub mod error;
pub mod exec;
