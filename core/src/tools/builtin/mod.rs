//! Built-in tool adapters

pub mod calculator;
pub mod page_extract;
pub mod web_search;
pub mod wikipedia;
pub mod wolfram;

pub use calculator::Calculator;
pub use page_extract::PageExtractor;
pub use web_search::WebSearch;
pub use wikipedia::WikiSearch;
pub use wolfram::WolframQuery;
