//! Spreadsheet-column style vertex labels: `A..Z`, `AA`, `AB`, ...

const ALPHABET: u8 = 26;

pub fn column_name(index: usize) -> String {
	let mut n = index;
	let mut letters = Vec::new();
	loop {
		letters.push(b'A' + (n % ALPHABET as usize) as u8);
		n /= ALPHABET as usize;
		if n == 0 {
			break;
		}
		n -= 1;
	}
	letters.iter().rev().map(|&b| b as char).collect()
}

/// Inverse of [`column_name`]. `None` for anything that is not a non-empty
/// run of `A..=Z`.
pub fn column_index(name: &str) -> Option<usize> {
	if name.is_empty() {
		return None;
	}
	let mut acc: usize = 0;
	for ch in name.chars() {
		if !ch.is_ascii_uppercase() {
			return None;
		}
		let digit = (ch as u8 - b'A') as usize + 1;
		acc = acc.checked_mul(ALPHABET as usize)?.checked_add(digit)?;
	}
	Some(acc - 1)
}

/// Sequence index to resume from after loading `names`.
pub fn next_index_after<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
	names
		.into_iter()
		.filter_map(column_index)
		.max()
		.map_or(0, |highest| highest + 1)
}
