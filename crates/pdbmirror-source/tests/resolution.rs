//! Resolution matrix across the built-in formats and mirrors.

use pdbmirror_source::{FormatKey, Protocol, ServerRegistry};

#[test]
fn every_format_resolves_on_an_eligible_mirror() {
    let registry = ServerRegistry::builtin();
    for key in FormatKey::ALL {
        let format = key.format();
        let candidates = registry.candidates(format);
        assert!(!candidates.is_empty(), "{key:?} has no eligible mirror");

        let protocol = format.allowed_protocols()[0];
        let index = format.multiple_files.then_some(1);
        let url = candidates[0]
            .file_url(protocol, format, "127d", format.has_compressed(), false, index)
            .unwrap();
        assert!(url.starts_with(protocol.url_prefix()), "{url}");
        assert!(url.contains("127d"), "{url}");
    }
}

#[test]
fn published_url_conventions_are_reproduced() {
    let registry = ServerRegistry::builtin();
    let ww = registry.get("WW").unwrap();
    let us = registry.get("US").unwrap();
    let uk = registry.get("UK").unwrap();
    let jp = registry.get("JP").unwrap();

    assert_eq!(
        ww.file_url(Protocol::Ftp, FormatKey::Pdb.format(), "127d", true, false, None)
            .unwrap(),
        "ftp://ftp.wwpdb.org/pub/pdb/data/structures/divided/pdb/27/pdb127d.ent.gz"
    );
    assert_eq!(
        ww.file_url(Protocol::Ftp, FormatKey::Pdb.format(), "127d", true, true, None)
            .unwrap(),
        "ftp://ftp.wwpdb.org/pub/pdb/data/structures/obsolete/pdb/27/pdb127d.ent.gz"
    );
    assert_eq!(
        us.file_url(Protocol::Https, FormatKey::PdbBundle.format(), "127d", true, false, None)
            .unwrap(),
        "https://files.rcsb.org/pub/pdb/compatible/pdb_bundle/27/127d/127d-pdb-bundle.tar.gz"
    );
    assert_eq!(
        uk.file_url(Protocol::Https, FormatKey::Pdbml.format(), "127d", true, false, None)
            .unwrap(),
        "https://ftp.ebi.ac.uk/pub/databases/pdb/data/structures/divided/XML/27/127d.xml.gz"
    );
    assert_eq!(
        jp.file_url(
            Protocol::Https,
            FormatKey::PdbAssembly.format(),
            "127d",
            true,
            false,
            Some(1)
        )
        .unwrap(),
        "https://data.pdbjbk1.pdbj.org/pub/pdb/data/biounit/PDB/divided/27/127d.pdb1.gz"
    );
    assert_eq!(
        us.file_url(Protocol::Https, FormatKey::Mmtf.format(), "127d", true, false, None)
            .unwrap(),
        "https://mmtf.rcsb.org/v1.0/full/127d"
    );
}
