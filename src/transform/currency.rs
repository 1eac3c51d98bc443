/// Parse a formatted currency string like "$123,456,789" into an integer
/// amount. Anything that is not a dollar-prefixed number yields None rather
/// than an error.
pub fn parse_box_office(value: Option<&str>) -> Option<i64> {
    let rest = value?.strip_prefix('$')?;
    rest.replace(',', "").parse().ok()
}
