pub mod accounts;
pub mod serve;
