pub mod provider;

pub use provider::HttpProvider;
