use crate::DocgenError;
use crate::DocgenResult;

/// The last line of the license banner every included source file starts
/// with.
pub const LICENSE_LAST_LINE: &str = "// under the License.";
pub const CODE_SEGMENT_BEGIN: &str = "// CODE-SEGMENT-BEGIN: ";
pub const CODE_SEGMENT_END: &str = "// CODE-SEGMENT-END: ";

/// Return everything after the license banner, trimmed. `file` is only used
/// for the error message.
pub fn strip_license_header<'a>(code: &'a str, file: &str) -> DocgenResult<&'a str> {
	match code.split_once(LICENSE_LAST_LINE) {
		Some((_, rest)) => Ok(rest.trim()),
		None => {
			Err(DocgenError::MissingLicenseHeader {
				file: file.to_string(),
			})
		}
	}
}

/// Byte offsets of every `marker` + `name` occurrence where the name is not
/// followed by more name characters.
fn marker_offsets(content: &str, marker: &str, name: &str) -> Vec<usize> {
	let needle = format!("{marker}{name}");
	content
		.match_indices(&needle)
		.map(|(offset, _)| offset)
		.filter(|offset| {
			content[offset + needle.len()..]
				.chars()
				.next()
				.is_none_or(char::is_whitespace)
		})
		.collect()
}

/// Extract the text between the begin and end markers of the named segment.
/// `file` is only used for error messages.
pub fn extract_segment<'a>(content: &'a str, name: &str, file: &str) -> DocgenResult<&'a str> {
	let missing = || {
		DocgenError::MissingSegment {
			segment: name.to_string(),
			file: file.to_string(),
		}
	};
	let duplicate = || {
		DocgenError::DuplicateSegment {
			segment: name.to_string(),
			file: file.to_string(),
		}
	};

	let begins = marker_offsets(content, CODE_SEGMENT_BEGIN, name);
	let ends = marker_offsets(content, CODE_SEGMENT_END, name);

	let (begin, end) = match (begins.as_slice(), ends.as_slice()) {
		([begin], [end]) => (*begin, *end),
		([], _) | (_, []) => return Err(missing()),
		_ => return Err(duplicate()),
	};

	let start = begin + CODE_SEGMENT_BEGIN.len() + name.len();
	if end < start {
		return Err(missing());
	}

	Ok(&content[start..end])
}

/// Whether a line is a segment marker comment.
pub fn is_segment_marker_line(line: &str) -> bool {
	line.contains(CODE_SEGMENT_BEGIN) || line.contains(CODE_SEGMENT_END)
}

/// Drop segment marker lines from published source code. Every kept line is
/// terminated with a newline.
pub fn strip_segment_markers(content: &str) -> String {
	let mut result = String::with_capacity(content.len());
	for line in content.lines() {
		if is_segment_marker_line(line) {
			continue;
		}
		result.push_str(line);
		result.push('\n');
	}

	result
}
