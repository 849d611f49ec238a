pub mod access_log;
pub mod bill;
pub mod gate;
