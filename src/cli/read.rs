use std::{fs::File, io::BufReader, path::Path};

use lia_sampler::{
    builder::smtlib,
    structures::formula::Formula,
    types::err::{self, ErrorKind},
};

/// Reads a formula from the file at `path`, decompressing `.xz` files when built with the `xz` feature.
pub fn read_formula(path: &Path) -> Result<Formula, ErrorKind> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(err::IOError::Read(e.kind()).into()),
    };

    match path.extension() {
        #[cfg(feature = "xz")]
        Some(extension) if extension == "xz" => {
            smtlib::read_from(BufReader::new(xz2::read::XzDecoder::new(file)))
        }

        _ => smtlib::read_from(BufReader::new(file)),
    }
}
