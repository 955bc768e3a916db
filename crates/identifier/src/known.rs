use netweather_models::{IdentificationMethod, LibraryInfo};
use std::collections::HashMap;
use std::sync::LazyLock;

/// SHA-256 of distribution files as served by the major CDNs
static KNOWN_CHECKSUMS: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        HashMap::from([
            // jQuery
            ("fc9a93dd241f6b045cbff0481cf4e1901becd0e12fb45166a8f17f95823f0b1a", ("jquery", "3.7.1")),
            ("0925e8ad7bd971391a8b1e98be8e87a6971919eb5b60c196485941c3c1df089a", ("jquery", "3.4.1")),
            ("220afd743d9e9643852e31a135a9f3ae3e71f7dacb69927ee7bd8b8a8fda0b58", ("jquery", "3.6.0")),
            // Bootstrap
            ("35f4547d9364111aca4850347356bc5660a994f0d8b694d88f995098a7b547fa", ("bootstrap", "5.3.0")),
            ("2560be0b32b92f6d77bee67c9b16c6b2946f32bb1e57bb44ccfdc5b5b5e10f2e", ("bootstrap", "5.2.3")),
        ])
    });

pub fn lookup_known(checksum: &str) -> Option<LibraryInfo> {
    KNOWN_CHECKSUMS.get(checksum).map(|(name, version)| {
        LibraryInfo::new(*name, *version, IdentificationMethod::ChecksumDb).with_checksum(checksum)
    })
}
