//! Snake case catalog identifiers to Go camel case

use heck::CamelCase;

/// Segments cased as acronyms rather than title case
const ACRONYMS: [&str; 3] = ["id", "html", "json"];

/// Upper camel case for field and struct names
///
/// Empty segments from consecutive underscores are dropped
pub fn upper_camel(ident: &str) -> String {
	ident
		.split('_')
		.filter(|seg| !seg.is_empty())
		.map(cased_segment)
		.collect()
}

/// Like [`upper_camel`] but the first segment is forced to lower case, for
/// serialization keys
pub fn lower_camel(ident: &str) -> String {
	let mut segs = ident.split('_').filter(|seg| !seg.is_empty());
	let first = match segs.next() {
		Some(seg) => seg.to_lowercase(),
		None => return String::new(),
	};
	segs.map(cased_segment).fold(first, |mut acc, seg| {
		acc += &seg;
		acc
	})
}

fn cased_segment(seg: &str) -> String {
	if ACRONYMS.iter().any(|a| a.eq_ignore_ascii_case(seg)) {
		seg.to_uppercase()
	} else {
		seg.to_camel_case()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn upper_camel_cases_segments() {
		assert_eq!(upper_camel("customer_id"), "CustomerID");
		assert_eq!(upper_camel("html_page"), "HTMLPage");
		assert_eq!(upper_camel("created_at"), "CreatedAt");
		assert_eq!(upper_camel("json"), "JSON");
	}

	#[test]
	fn lower_camel_lowers_first_segment() {
		assert_eq!(lower_camel("customer_id"), "customerID");
		assert_eq!(lower_camel("id_col"), "idCol");
		assert_eq!(lower_camel("created_at"), "createdAt");
	}

	#[test]
	fn empty_segments_are_dropped() {
		assert_eq!(upper_camel("a__b"), "AB");
		assert_eq!(upper_camel("_leading"), "Leading");
		assert_eq!(lower_camel("a__b"), "aB");
	}

	#[test]
	fn empty_input_is_empty_output() {
		assert_eq!(upper_camel(""), "");
		assert_eq!(lower_camel(""), "");
	}
}
