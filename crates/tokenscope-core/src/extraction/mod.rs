pub mod model;

pub use model::{
    iso_timestamp, ColorToken, ExtractionResult, RadiusToken, SpacingToken, TypographyToken,
};
