//! Format-name lookup for driver construction.

use crate::binary::BinaryFormat;
use crate::error::DatafileError;
use crate::format::DataFormat;

/// Create a format driver from a format name.
///
/// Currently knows `"gyrc"` (and its alias `"binary"`), the reference
/// binary driver. Unknown names fail with
/// [`DatafileError::UnknownFormat`].
pub fn create_format(name: &str) -> Result<Box<dyn DataFormat>, DatafileError> {
    match name {
        "gyrc" | "binary" => Ok(Box::new(BinaryFormat::new())),
        _ => Err(DatafileError::UnknownFormat {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert!(create_format("gyrc").is_ok());
        assert!(create_format("binary").is_ok());
    }

    #[test]
    fn unknown_name_fails() {
        assert!(matches!(
            create_format("netcdf"),
            Err(DatafileError::UnknownFormat { name }) if name == "netcdf"
        ));
    }
}
