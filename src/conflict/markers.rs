//! Pure scanning of git conflict markers
//!
//! No filesystem or subprocess access here; the resolver feeds file content
//! in and splices replacements back out.

const START: &str = "<<<<<<<";
const BASE: &str = "|||||||";
const SEPARATOR: &str = "=======";
const END: &str = ">>>>>>>";

/// One marker-delimited region inside a file's content
///
/// Offsets are byte offsets into the scanned text. `end_offset` is exclusive
/// and points past the end marker line's newline (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRegion {
    /// Start of the `<<<<<<<` line
    pub start_offset: usize,
    /// Start of the `=======` line
    pub separator_offset: usize,
    /// One past the `>>>>>>>` line
    pub end_offset: usize,
    /// Text between the start marker and the separator (or base marker)
    pub ours_text: String,
    /// Text between the separator and the end marker
    pub theirs_text: String,
    /// Common ancestor text, present with `merge.conflictStyle=diff3`
    pub base_text: Option<String>,
}

impl ConflictRegion {
    /// The raw region text, markers included
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start_offset..self.end_offset]
    }
}

#[derive(Clone, Copy)]
enum Scan {
    Outside,
    Ours { start: usize, body: usize },
    Base { start: usize, ours: (usize, usize), body: usize },
    Theirs {
        start: usize,
        ours: (usize, usize),
        base: Option<(usize, usize)>,
        separator: usize,
        body: usize,
    },
}

fn is_separator(line: &str) -> bool {
    line.trim_end() == SEPARATOR
}

/// Find the first complete region starting at or after `from`.
///
/// `from` is snapped forward to the next line start. An unterminated region
/// yields `None`; a stray start marker inside a region restarts the scan.
pub fn find_next_region(text: &str, from: usize) -> Option<ConflictRegion> {
    let mut offset = line_start_at_or_after(text, from)?;
    let mut state = Scan::Outside;

    for line in text[offset..].split_inclusive('\n') {
        let line_start = offset;
        let line_end = offset + line.len();
        offset = line_end;

        if line.starts_with(START) {
            state = Scan::Ours {
                start: line_start,
                body: line_end,
            };
            continue;
        }

        state = match state {
            Scan::Outside => Scan::Outside,
            Scan::Ours { start, body } if line.starts_with(BASE) => Scan::Base {
                start,
                ours: (body, line_start),
                body: line_end,
            },
            Scan::Ours { start, body } if is_separator(line) => Scan::Theirs {
                start,
                ours: (body, line_start),
                base: None,
                separator: line_start,
                body: line_end,
            },
            Scan::Base { start, ours, body } if is_separator(line) => Scan::Theirs {
                start,
                ours,
                base: Some((body, line_start)),
                separator: line_start,
                body: line_end,
            },
            Scan::Theirs {
                start,
                ours,
                base,
                separator,
                body,
            } if line.starts_with(END) => {
                return Some(ConflictRegion {
                    start_offset: start,
                    separator_offset: separator,
                    end_offset: line_end,
                    ours_text: text[ours.0..ours.1].to_string(),
                    theirs_text: text[body..line_start].to_string(),
                    base_text: base.map(|(a, b)| text[a..b].to_string()),
                });
            }
            other => other,
        };
    }

    None
}

/// All complete, non-overlapping regions in order
pub fn find_conflict_regions(text: &str) -> Vec<ConflictRegion> {
    let mut regions = Vec::new();
    let mut from = 0;
    while let Some(region) = find_next_region(text, from) {
        from = region.end_offset;
        regions.push(region);
    }
    regions
}

/// Replace `region` in `text` with `replacement`.
///
/// Returns the new text and the offset just past the replacement, where the
/// next scan must start. A non-empty replacement is given the region's
/// trailing newline when it lacks one, so the resume offset always sits at a
/// line start and a directly following region is still found.
pub fn splice_region(text: &str, region: &ConflictRegion, replacement: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + replacement.len() + 1);
    out.push_str(&text[..region.start_offset]);
    out.push_str(replacement);
    if !replacement.is_empty()
        && !replacement.ends_with('\n')
        && region.raw(text).ends_with('\n')
    {
        out.push('\n');
    }
    let resume = out.len();
    out.push_str(&text[region.end_offset..]);
    (out, resume)
}

/// Whether `text` carries any conflict marker token.
///
/// `<<<<<<<` and `>>>>>>>` count anywhere; `=======` only as a whole line
/// and `|||||||` only at a line start, since both occur in ordinary prose.
pub fn contains_conflict_markers(text: &str) -> bool {
    text.contains(START)
        || text.contains(END)
        || text
            .lines()
            .any(|line| is_separator(line) || line.starts_with(BASE))
}

fn line_start_at_or_after(text: &str, from: usize) -> Option<usize> {
    if from >= text.len() {
        return None;
    }
    if from == 0 || text.as_bytes()[from - 1] == b'\n' {
        return Some(from);
    }
    text[from..].find('\n').map(|i| from + i + 1).filter(|&i| i < text.len())
}
