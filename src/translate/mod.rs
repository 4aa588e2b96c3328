pub mod interface;
pub mod google;
pub mod factory;

pub use interface::{TranslateInterface, TranslateRequest, TranslateResult};
pub use factory::TranslateFactory;
