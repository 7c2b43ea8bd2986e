//! Host keyboard table to guest keymap identifiers.
//!
//! Host keyboard configuration names a console layout (`us`, `de-latin1`,
//! `jp106`, ...). libvirt wants one of the keymap identifiers QEMU ships
//! (`en-us`, `de`, `ja`, ...). The table maps the former onto the latter.

use std::collections::BTreeSet;

/// Keymap every lookup falls back to when the host layout is unknown.
pub const FALLBACK_KEYMAP: &str = "en-us";

const KEYTABLE: &[(&str, &str)] = &[
    ("ar", "ar"),
    ("be", "fr-be"),
    ("be-latin1", "fr-be"),
    ("br", "pt-br"),
    ("br-abnt2", "pt-br"),
    ("ca", "fr-ca"),
    ("cf", "fr-ca"),
    ("cz-us-qwertz", "cz"),
    ("cz", "cz"),
    ("da", "da"),
    ("de", "de"),
    ("de-ch", "de-ch"),
    ("de-latin1", "de"),
    ("de-latin1-nodeadkeys", "de"),
    ("dk", "da"),
    ("dk-latin1", "da"),
    ("dvorak", "en-us"),
    ("en-gb", "en-gb"),
    ("en-us", "en-us"),
    ("es", "es"),
    ("et", "et"),
    ("fi", "fi"),
    ("fi-latin1", "fi"),
    ("fo", "fo"),
    ("fr", "fr"),
    ("fr-be", "fr-be"),
    ("fr-ca", "fr-ca"),
    ("fr-ch", "fr-ch"),
    ("fr-latin1", "fr"),
    ("fr-latin9", "fr"),
    ("fr_ch", "fr-ch"),
    ("fr_ch-latin1", "fr-ch"),
    ("gb", "en-gb"),
    ("hr", "hr"),
    ("hu", "hu"),
    ("is", "is"),
    ("is-latin1", "is"),
    ("it", "it"),
    ("ja", "ja"),
    ("jp", "ja"),
    ("jp106", "ja"),
    ("lt", "lt"),
    ("lv", "lv"),
    ("mk", "mk"),
    ("mk-utf", "mk"),
    ("nl", "nl"),
    ("nl-be", "nl-be"),
    ("no", "no"),
    ("no-latin1", "no"),
    ("pl", "pl"),
    ("pl2", "pl"),
    ("pt", "pt"),
    ("pt-br", "pt-br"),
    ("pt-latin1", "pt"),
    ("ru", "ru"),
    ("ru1", "ru"),
    ("se-latin1", "sv"),
    ("sg", "de-ch"),
    ("sg-latin1", "de-ch"),
    ("sl", "sl"),
    ("slovene", "sl"),
    ("sv", "sv"),
    ("sv-latin1", "sv"),
    ("th", "th"),
    ("tr", "tr"),
    ("trq", "tr"),
    ("uk", "en-gb"),
    ("us", "en-us"),
];

/// Map a host keyboard name onto a guest keymap identifier
pub fn lookup(host_name: &str) -> Option<&'static str> {
    let key = host_name.to_lowercase();
    KEYTABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// All guest keymap identifiers the table knows, sorted and deduplicated
pub fn valid_keymaps() -> Vec<&'static str> {
    KEYTABLE
        .iter()
        .map(|(_, v)| *v)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
