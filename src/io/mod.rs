//! File formats: GML for the flattened network, the tab-separated compound
//! key and the pool compound list.

mod ckey;
pub mod gml;
mod pools;

pub use ckey::{compound_key_path, write_compound_key};
pub use gml::{parse_gml, read_gml, write_gml};
pub use pools::PoolSet;
