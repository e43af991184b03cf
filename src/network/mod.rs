pub mod provider;
pub mod source;


pub use provider::{AlloyChainSource, EthProvider};
pub use source::{ChainDataSource, ProviderError};
