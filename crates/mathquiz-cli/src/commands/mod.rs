pub mod autofill;
pub mod fmt;
pub mod init;
pub mod suggest;
pub mod symbols;
pub mod validate;
