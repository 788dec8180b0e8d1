mod config_gen;
mod hash_password;
mod secret;

pub use config_gen::config_generate;
pub use hash_password::hash_password;
pub use secret::gen_secret;
