//! HDF5 container serialization.
//!
//! One group of gzip-compressed band datasets plus a flat attribute set
//! on the file root. The destination path arrives pre-resolved; naming
//! policy lives in the resolver. Writes are idempotent with respect to
//! already-present datasets and attributes: existing entries are skipped,
//! never overwritten.
use std::path::Path;

use hdf5::types::VarLenUnicode;
use thiserror::Error;
use tracing::info;

use crate::core::assemble::Product;
use crate::types::AttributeValue;

/// Group holding the geocoded band datasets.
pub const GEOCODE_GROUP: &str = "GEOCODE";

const DEFLATE_LEVEL: u8 = 6;

/// Errors encountered while writing the container
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container I/O error: {0}")]
    Hdf5(#[from] hdf5::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("attribute `{name}` is not encodable in the container")]
    AttributeEncoding { name: String },
}

/// Serialize a product into the container at `destination`, creating the
/// file if needed or appending to an existing one.
pub fn write_product(product: &Product, destination: &Path) -> Result<(), ContainerError> {
    info!("Writing container: {:?}", destination);
    let file = hdf5::File::append(destination)?;
    let group = match file.group(GEOCODE_GROUP) {
        Ok(group) => group,
        Err(_) => file.create_group(GEOCODE_GROUP)?,
    };

    for (role, plane) in &product.bands {
        let name = role.dataset_name();
        if group.link_exists(name) {
            info!("Dataset `{}` already present, skipping", name);
            continue;
        }
        group
            .new_dataset_builder()
            .deflate(DEFLATE_LEVEL)
            .with_data(plane.view())
            .create(name)?;
    }

    let existing = file.attr_names()?;
    for (key, value) in &product.attrs {
        if existing.iter().any(|n| n == key) {
            info!("Attribute `{}` already present, skipping", key);
            continue;
        }
        write_attribute(&file, key, value)?;
    }

    file.flush()?;
    Ok(())
}

// Scalar attribute per AttributeValue tag. Dates serialize as their
// compact string form, matching the rest of the archive's conventions.
fn write_attribute(
    file: &hdf5::File,
    name: &str,
    value: &AttributeValue,
) -> Result<(), ContainerError> {
    match value {
        AttributeValue::Int(v) => {
            let attr = file.new_attr::<i64>().create(name)?;
            attr.write_scalar(v)?;
        }
        AttributeValue::Float(v) => {
            let attr = file.new_attr::<f64>().create(name)?;
            attr.write_scalar(v)?;
        }
        AttributeValue::Str(_) | AttributeValue::Date(_) => {
            let text = value.to_string();
            let encoded: VarLenUnicode =
                text.parse()
                    .map_err(|_| ContainerError::AttributeEncoding {
                        name: name.to_string(),
                    })?;
            let attr = file.new_attr::<VarLenUnicode>().create(name)?;
            attr.write_scalar(&encoded)?;
        }
    }
    Ok(())
}
