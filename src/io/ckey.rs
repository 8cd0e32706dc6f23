use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::registry::CompoundRegistry;

/// Writes one `id<TAB>name<TAB>smiles` line per compound, in id order.
pub fn write_compound_key<W: Write>(registry: &CompoundRegistry, mut out: W) -> io::Result<()> {
    for compound in registry.compounds() {
        writeln!(out, "{}\t{}\t{}", compound.id, compound.name, compound.smiles)?;
    }
    out.flush()
}

/// Path of the compound key written next to a network file.
pub fn compound_key_path(network: &Path) -> PathBuf {
    let mut path = OsString::from(network.as_os_str());
    path.push(".ckey");
    PathBuf::from(path)
}
