// Pipeline processing: format detection and normalization

pub mod normalize;
