//! Airtable `filterByFormula` expressions for the locations table.

use pollfinder_core::types::{
    FIELD_ACTIVE, FIELD_COUNTY, FIELD_LATITUDE, FIELD_LONGITUDE, FIELD_PRECINCT_NUMBER,
};
use pollfinder_core::Precinct;

/// `Precinct Number` value for locations that serve a whole county.
pub const ALL_PRECINCTS: &str = "All";

/// Builds the filter selecting active, geocoded locations that serve
/// `precinct`: either that precinct number or the county-wide `All` rows.
#[must_use]
pub fn precinct_filter(precinct: &Precinct) -> String {
    format!(
        "AND({{{lat}}} != BLANK(), {{{lng}}} != BLANK(), {{{county}}} = {county_value}, \
         OR({{{number}}} = {precinct_value}, {{{number}}} = {all}), {{{active}}} = 1)",
        lat = FIELD_LATITUDE,
        lng = FIELD_LONGITUDE,
        county = FIELD_COUNTY,
        number = FIELD_PRECINCT_NUMBER,
        active = FIELD_ACTIVE,
        county_value = quote(&precinct.county),
        precinct_value = quote(&precinct.precinct_id),
        all = quote(ALL_PRECINCTS),
    )
}

/// Double-quotes a formula string literal, escaping `\` and `"`.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
