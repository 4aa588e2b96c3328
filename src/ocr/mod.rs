pub mod confidence;
pub mod interface;
pub mod ocr_space;
pub mod factory;

pub use interface::{OcrInterface, OcrResult};
pub use factory::OcrFactory;
