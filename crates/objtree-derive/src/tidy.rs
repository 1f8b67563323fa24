//! Display-string normalization for token streams.
//!
//! `quote` prints `Vec<&str>` as `Vec < & str >`; labels want the former.

use quote::ToTokens;

const RULES: &[(&str, &str)] = &[
    (" < ", "<"),
    ("< ", "<"),
    (" <", "<"),
    (" >", ">"),
    (" ,", ","),
    (" ;", ";"),
    (" :: ", "::"),
    (":: ", "::"),
    (" ::", "::"),
    ("& ", "&"),
    ("( ", "("),
    (" )", ")"),
    ("[ ", "["),
    (" ]", "]"),
];

pub fn tidy(raw: &str) -> String {
    let mut out = raw.trim().to_string();
    for (from, to) in RULES {
        out = out.replace(from, to);
    }
    out
}

/// Tidied rendering of a type.
pub fn display(ty: &impl ToTokens) -> String {
    tidy(&ty.to_token_stream().to_string())
}
