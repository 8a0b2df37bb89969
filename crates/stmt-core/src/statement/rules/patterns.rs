//! Common regex patterns for statement field normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DD/MM/YYYY, day and month may be a single digit
    pub static ref DATE_DMY_LONG: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{4})$"
    ).unwrap();

    // DD/MM/YY
    pub static ref DATE_DMY_SHORT: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{2})$"
    ).unwrap();
}
