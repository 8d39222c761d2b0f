//! Metropolitan city codes and display names.

const CITY_AIRPORTS: &[(&str, &[&str])] = &[
    ("LON", &["LHR", "LGW", "LCY", "STN", "LTN"]),
    ("NYC", &["JFK", "EWR", "LGA"]),
    ("PAR", &["CDG", "ORY"]),
    ("TYO", &["NRT", "HND"]),
    ("ATH", &["ATH"]),
    ("BOM", &["BOM"]),
    ("DEL", &["DEL"]),
];

const CITY_NAMES: &[(&str, &str)] = &[
    ("DEL", "DELHI.IN"),
    ("DOH", "DOHA.QA"),
    ("LHR", "LONDON.GB"),
    ("LON", "LONDON.GB"),
    ("DXB", "DUBAI.AE"),
    ("JFK", "NEW YORK.US"),
    ("BOM", "MUMBAI.IN"),
    ("ATH", "ATHENS.GR"),
    ("SIN", "SINGAPORE.SG"),
    ("FRA", "FRANKFURT.DE"),
    ("CDG", "PARIS.FR"),
];

/// All airports served by `code`. A code not in the table is its own airport.
pub fn airports_for(code: &str) -> Vec<&str> {
    CITY_AIRPORTS
        .iter()
        .find(|(city, _)| *city == code)
        .map(|(_, airports)| airports.to_vec())
        .unwrap_or_else(|| vec![code])
}

/// The airport actually searched for `code`: the first one the city resolves to.
pub fn primary_airport(code: &str) -> &str {
    airports_for(code).first().copied().unwrap_or(code)
}

/// `DOHA.QA`, falling back to the code itself.
pub fn city_name(code: &str) -> &str {
    CITY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_codes_expand() {
        assert_eq!(airports_for("NYC"), vec!["JFK", "EWR", "LGA"]);
        assert_eq!(primary_airport("LON"), "LHR");
        assert_eq!(primary_airport("PAR"), "CDG");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(airports_for("DOH"), vec!["DOH"]);
        assert_eq!(primary_airport("DOH"), "DOH");
        assert_eq!(city_name("XYZ"), "XYZ");
        assert_eq!(city_name("DOH"), "DOHA.QA");
    }
}
