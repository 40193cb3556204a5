#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod appfilter;
pub mod config;
pub mod converter;
pub mod extract;
pub mod index;
pub mod mapping;
pub mod matching;
pub mod models;
pub mod output;
pub mod resolve;

pub use config::{ConversionOptions, ConverterConfig};
pub use converter::{ConversionError, IconConverter};
pub use extract::{Apktool, ResourceExtractor};
pub use mapping::{MappingTable, MappingTableError, SynonymTable};
pub use models::{ConversionReport, ConversionStats};
