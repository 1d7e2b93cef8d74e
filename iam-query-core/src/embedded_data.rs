//! Service reference documents compiled into the binary.
//!
//! The corpus under `resources/service-reference` is embedded at compile time so
//! the tool answers queries without any files on disk.

use std::borrow::Cow;

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "resources/service-reference"]
#[include = "*.json"]
pub(crate) struct EmbeddedServiceReference;

impl EmbeddedServiceReference {
    /// Every embedded document as `(file name, bytes)`, sorted by file name.
    pub(crate) fn documents() -> Vec<(String, Cow<'static, [u8]>)> {
        let mut names: Vec<String> = Self::iter().map(|name| name.into_owned()).collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| {
                let file = Self::get(&name)?;
                Some((name, file.data))
            })
            .collect()
    }
}
