//! Deterministic row identity.
//!
//! The id is an MD5 fingerprint of the account followed by every column value in
//! header order. It deduplicates re-ingested rows and is not a security credential.

use md5::{Digest, Md5};

use crate::models::{Header, Record};

/// Hash `account` followed by `values` into a 32-character lowercase hex id.
pub fn fingerprint<I, S>(account: &str, values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Md5::new();
    hasher.update(account.as_bytes());
    for value in values {
        hasher.update(value.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Compute the id of `record` under `header`.
///
/// Every named column contributes its value's textual form in declared order. A
/// column missing from the record contributes an empty string so positions never
/// shift. Placeholder slots contribute nothing.
pub fn compute_id(record: &Record, header: &Header, account: &str) -> String {
    let values = header.named().map(|(_, column)| {
        record
            .get(column)
            .map(|value| value.to_string())
            .unwrap_or_default()
    });
    fingerprint(account, values)
}
