pub mod enrichment_service;
pub mod generation_service;
pub mod geocoding_service;
pub mod prompt_builder;
