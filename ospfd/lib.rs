pub mod capture;
pub mod config;
pub mod constant;
pub mod database;
pub mod error;
pub mod flooding;
mod gen_lsa;
mod handler;
pub mod interface;
pub mod logging;
pub mod neighbor;
pub mod router;
pub mod sender;
pub mod timer;
pub mod util;

pub use error::Error;
