pub mod domain;
pub mod episode;
pub mod source;
