use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::numerals::{is_roman_letter, normalize_digits, parse_chapter_ordinal};

// @module: Chapter detection and content segmentation

// Minimum trimmed length for text before the first heading to count as an
// introduction chapter rather than stray blank lines or decoration.
const INTRO_MIN_CHARS: usize = 50;

// @const: Filename fallback patterns, tried in order; first match wins
static FILE_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^\W*(?:Chương|Chapter|Ch\.|C)\s*(\d+)\s*[-:–—\s]*(.*?)\W*\.txt$")
            .unwrap(),
        Regex::new(r"(?i)^\W*(\d+)\s*[-:–—.]*\s*(.*?)\W*\.txt$").unwrap(),
    ]
});

/// Raw input to segmentation: a named blob of text
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Original file name
    pub name: String,

    /// File content
    pub content: String,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// How inputs with no recognizable headings are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// The whole file becomes one chapter
    Single,
    /// Fall back to filename heuristics per file
    Multiple,
}

/// Status attached to a segmented chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    Ok,
    Warning,
}

/// Metadata attached to one segmented chapter
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterInfo {
    /// Logical chapter ordinal; `None` when undetectable
    pub number: Option<u32>,

    /// Chapter title, when one was found
    pub name: Option<String>,

    /// Ok, or Warning with an explanatory message
    pub status: ChapterStatus,

    /// Human-readable advisory attached during segmentation or post-processing
    pub message: Option<String>,
}

impl ChapterInfo {
    fn ok(number: Option<u32>, name: Option<String>) -> Self {
        Self {
            number,
            name,
            status: ChapterStatus::Ok,
            message: None,
        }
    }
}

/// One logical chapter produced by segmentation
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    /// Name used for the chapter's output file
    pub source_name: String,

    /// Chapter text content
    pub content: String,

    /// Detection metadata
    pub info: ChapterInfo,
}

// A heading found by the scanner: where its line starts in the normalized
// text, the raw ordinal token and the raw trailing title text.
#[derive(Debug, Clone)]
struct HeadingMatch {
    start: usize,
    ordinal_token: String,
    title: String,
}

/// Line-scanning heading detector.
///
/// A heading line is, in order: optional whitespace, up to five decoration
/// characters (`# * _ - ~`) with optional whitespace and an optional `**`
/// bold marker, a chapter keyword, an optional separator, an ordinal token
/// (1-5 Arabic digits or a run of Roman letters, ending at a word boundary)
/// and free-form trailing title text. The keyword list is configurable so
/// localized spellings can be added without touching the scanner.
#[derive(Debug, Clone)]
pub struct HeadingScanner {
    keywords: Vec<String>,
}

impl Default for HeadingScanner {
    fn default() -> Self {
        Self::new(&["chương", "chapter", "ch.", "c"])
    }
}

impl HeadingScanner {
    /// Create a scanner with the given keyword synonyms, tried in order
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    // Find every heading line in `text`, with byte offsets of line starts.
    fn scan(&self, text: &str) -> Vec<HeadingMatch> {
        let mut headings = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            if let Some((ordinal_token, title)) = self.parse_heading_line(line) {
                headings.push(HeadingMatch {
                    start: offset,
                    ordinal_token,
                    title,
                });
            }
            offset += line.len() + 1;
        }
        headings
    }

    // Parse a single line as a heading. Decoration is consumed greedily but
    // backs off so that runs like "******Chapter 1" still leave a bold
    // marker to strip, mirroring how the pieces can share characters.
    fn parse_heading_line(&self, line: &str) -> Option<(String, String)> {
        let after_ws = line.trim_start();
        let deco_max = after_ws
            .chars()
            .take(5)
            .take_while(|c| is_decoration(*c))
            .count();

        for deco in (0..=deco_max).rev() {
            let mut rest = skip_chars(after_ws, deco).trim_start();
            if let Some(stripped) = rest.strip_prefix("**") {
                rest = stripped;
            }
            let rest = rest.trim_start();

            for keyword in &self.keywords {
                if let Some(after_keyword) = strip_keyword(rest, keyword) {
                    if let Some(parsed) = parse_ordinal_and_title(after_keyword) {
                        return Some(parsed);
                    }
                }
            }
        }
        None
    }
}

fn is_decoration(c: char) -> bool {
    matches!(c, '#' | '*' | '_' | '-' | '~')
}

fn is_separator(c: char) -> bool {
    matches!(c, ':' | '.' | '-' | '–' | '—')
}

// ASCII word character, the boundary rule ordinal tokens end on.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn skip_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

// Case-insensitive prefix match; returns the remainder after the keyword.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let mut rest = text;
    for expected in keyword.chars() {
        let c = rest.chars().next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        rest = &rest[c.len_utf8()..];
    }
    Some(rest)
}

// After the keyword: optional whitespace, at most one separator, optional
// whitespace, then the ordinal token ending at a word boundary. Returns the
// raw token and the raw trailing title.
fn parse_ordinal_and_title(text: &str) -> Option<(String, String)> {
    let mut rest = text.trim_start();
    if let Some(c) = rest.chars().next() {
        if is_separator(c) {
            rest = &rest[c.len_utf8()..];
        }
    }
    let rest = rest.trim_start();

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        let after = &rest[digits.len()..];
        if digits.len() <= 5 && !after.chars().next().is_some_and(is_word_char) {
            return Some((digits, after.to_string()));
        }
        // A longer digit run, or digits glued to a word, is not a heading;
        // a Roman reading cannot start with a digit either.
        return None;
    }

    let roman: String = rest.chars().take_while(|c| is_roman_letter(*c)).collect();
    if !roman.is_empty() {
        let after = &rest[roman.len()..];
        if !after.chars().next().is_some_and(is_word_char) {
            return Some((roman, after.to_string()));
        }
    }

    None
}

// Title cleanup: strip leading separators and trailing decoration/punctuation,
// collapse to None when nothing is left.
fn clean_title(raw: &str) -> Option<String> {
    let title = raw
        .trim()
        .trim_start_matches(|c: char| c.is_whitespace() || is_separator(c))
        .trim_end_matches(|c: char| matches!(c, '#' | '*' | '_' | '-' | '~' | '`' | '.'))
        .trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// Strip a trailing .txt (any case) to get the display name of a file.
fn file_stem(name: &str) -> String {
    let stem = name
        .len()
        .checked_sub(4)
        .and_then(|cut| name.get(cut..).map(|tail| (cut, tail)))
        .filter(|(_, tail)| tail.eq_ignore_ascii_case(".txt"))
        .map(|(cut, _)| &name[..cut]);
    stem.unwrap_or(name).to_string()
}

// Filename fallback used in Multiple mode when a file has no headings.
fn analyze_file_name(file_name: &str) -> (Option<u32>, Option<String>) {
    for pattern in FILE_NAME_PATTERNS.iter() {
        let Some(caps) = pattern.captures(file_name) else {
            continue;
        };
        let Some(number) = caps[1].parse::<u32>().ok() else {
            continue;
        };
        let name = caps[2].trim().replace('_', " ");
        let name = if name.is_empty() { None } else { Some(name) };
        return (Some(number), name);
    }
    (None, None)
}

/// Splits raw text files into an ordered, validated sequence of chapters
#[derive(Debug, Clone, Default)]
pub struct ChapterSegmenter {
    scanner: HeadingScanner,
}

impl ChapterSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom keyword list for heading detection
    pub fn with_keywords(keywords: &[&str]) -> Self {
        Self {
            scanner: HeadingScanner::new(keywords),
        }
    }

    /// Segment the given files into chapters.
    ///
    /// One input file expands into as many chapters as it has headings (plus
    /// an introduction chapter when enough text precedes the first heading),
    /// or stays a single entry when it has none. The combined sequence is
    /// sorted by ordinal and checked for duplicates and gaps.
    pub fn segment(&self, files: &[RawFile], mode: SegmentMode) -> Vec<AnalyzedFile> {
        let mut chapters = Vec::new();

        for file in files {
            let content = normalize_digits(&normalize_line_endings(&file.content));
            let headings = self.scanner.scan(&content);
            debug!("{}: {} heading(s) found", file.name, headings.len());

            if headings.is_empty() {
                chapters.push(self.fallback_chapter(file, mode));
                continue;
            }

            // Text before the first heading becomes an introduction chapter
            // when it is substantial enough.
            if headings[0].start > 0 {
                let intro = content[..headings[0].start].trim();
                if intro.chars().count() > INTRO_MIN_CHARS {
                    chapters.push(AnalyzedFile {
                        source_name: "Chapter 000 - Introduction.txt".to_string(),
                        content: intro.to_string(),
                        info: ChapterInfo::ok(Some(0), Some("Introduction".to_string())),
                    });
                }
            }

            for (i, heading) in headings.iter().enumerate() {
                let end = headings
                    .get(i + 1)
                    .map(|next| next.start)
                    .unwrap_or(content.len());
                let chapter_content = content[heading.start..end].trim();
                let name = clean_title(&heading.title);

                // A heading whose ordinal cannot be parsed is dropped.
                let Some(number) = parse_chapter_ordinal(&heading.ordinal_token) else {
                    continue;
                };

                let source_name = match &name {
                    Some(title) => format!("Chapter {:03} - {}.txt", number, title),
                    None => format!("Chapter {:03}.txt", number),
                };
                chapters.push(AnalyzedFile {
                    source_name,
                    content: chapter_content.to_string(),
                    info: ChapterInfo::ok(Some(number), name),
                });
            }
        }

        sort_chapters(&mut chapters);
        flag_duplicates_and_gaps(&mut chapters);
        chapters
    }

    // No headings in the content: one whole-file chapter in Single mode,
    // filename heuristics in Multiple mode.
    fn fallback_chapter(&self, file: &RawFile, mode: SegmentMode) -> AnalyzedFile {
        match mode {
            SegmentMode::Single => AnalyzedFile {
                source_name: file.name.clone(),
                content: file.content.clone(),
                info: ChapterInfo {
                    number: Some(1),
                    name: Some(file_stem(&file.name)),
                    status: ChapterStatus::Ok,
                    message: Some("The whole file was treated as one chapter.".to_string()),
                },
            },
            SegmentMode::Multiple => {
                let (number, name) = analyze_file_name(&file.name);
                let recognized = number.is_some();
                AnalyzedFile {
                    source_name: file.name.clone(),
                    content: file.content.clone(),
                    info: ChapterInfo {
                        number,
                        name,
                        status: if recognized {
                            ChapterStatus::Ok
                        } else {
                            ChapterStatus::Warning
                        },
                        message: if recognized {
                            None
                        } else {
                            Some("Chapter could not be identified.".to_string())
                        },
                    },
                }
            }
        }
    }
}

// Ascending by ordinal; entries without one sort last, among themselves by
// source name.
fn sort_chapters(chapters: &mut [AnalyzedFile]) {
    chapters.sort_by(|a, b| match (a.info.number, b.info.number) {
        (None, None) => a.source_name.cmp(&b.source_name),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y),
    });
}

// Post-processing over the sorted sequence. Every occurrence of an ordinal
// claimed more than once is flagged as a duplicate and excluded from gap
// tracking, so gaps are measured against the last uniquely-claimed ordinal.
// Ordinal 0 is a preface and never triggers a gap.
fn flag_duplicates_and_gaps(chapters: &mut [AnalyzedFile]) {
    let mut occurrences: HashMap<u32, usize> = HashMap::new();
    for chapter in chapters.iter() {
        if let Some(number) = chapter.info.number {
            *occurrences.entry(number).or_default() += 1;
        }
    }

    let mut last_ordinal: Option<u32> = None;
    for chapter in chapters.iter_mut() {
        let Some(number) = chapter.info.number else {
            continue;
        };

        if occurrences.get(&number).copied().unwrap_or(0) > 1 {
            chapter.info.status = ChapterStatus::Warning;
            chapter.info.message = Some(format!("Duplicate chapter number ({}).", number));
            continue;
        }

        if let Some(last) = last_ordinal {
            if number > last + 1 && number != 0 {
                let (from, to) = (last + 1, number - 1);
                let gap_message = if from == to {
                    format!("Missing chapter {}.", from)
                } else {
                    format!("Missing chapters {} to {}.", from, to)
                };
                chapter.info.status = ChapterStatus::Warning;
                chapter.info.message = Some(match chapter.info.message.take() {
                    Some(existing) => format!("{} {}", existing, gap_message),
                    None => gap_message,
                });
            }
        }
        last_ordinal = Some(number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_one(content: &str) -> Vec<AnalyzedFile> {
        ChapterSegmenter::new().segment(
            &[RawFile::new("book.txt", content)],
            SegmentMode::Single,
        )
    }

    #[test]
    fn test_segment_shouldSplitOnHeadings() {
        let content = "Chapter 1 - The Beginning\nfirst body\nChapter 2 - The Middle\nsecond body";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].info.number, Some(1));
        assert_eq!(chapters[0].info.name.as_deref(), Some("The Beginning"));
        assert_eq!(chapters[0].content, "Chapter 1 - The Beginning\nfirst body");
        assert_eq!(chapters[0].source_name, "Chapter 001 - The Beginning.txt");
        assert_eq!(chapters[1].info.number, Some(2));
        assert_eq!(chapters[1].content, "Chapter 2 - The Middle\nsecond body");
    }

    #[test]
    fn test_segment_shouldRecognizeDecoratedAndBoldHeadings() {
        let content = "### Chapter 3: Storm\nbody\n**Chương 4 - Mưa**\nbody\n~~ ch. 5. Calm\nbody";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].info.number, Some(3));
        assert_eq!(chapters[0].info.name.as_deref(), Some("Storm"));
        assert_eq!(chapters[1].info.number, Some(4));
        assert_eq!(chapters[1].info.name.as_deref(), Some("Mưa"));
        assert_eq!(chapters[2].info.number, Some(5));
        assert_eq!(chapters[2].info.name.as_deref(), Some("Calm"));
    }

    #[test]
    fn test_segment_shouldParseRomanNumeralHeadings() {
        let content = "Chapter IV\nbody four\nChapter V - Title\nbody five";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].info.number, Some(4));
        assert_eq!(chapters[0].info.name, None);
        assert_eq!(chapters[1].info.number, Some(5));
        assert_eq!(chapters[1].info.name.as_deref(), Some("Title"));
    }

    #[test]
    fn test_segment_shouldNormalizeFullWidthDigitsInHeadings() {
        let content = "Chương １２ - Tên chương\nnội dung";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].info.number, Some(12));
    }

    #[test]
    fn test_segment_shouldEmitIntroductionChapter() {
        let preface = "An opening passage that is clearly longer than fifty characters of text.";
        let content = format!("{}\nChapter 1 - Start\nbody", preface);
        let chapters = segment_one(&content);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].info.number, Some(0));
        assert_eq!(chapters[0].info.name.as_deref(), Some("Introduction"));
        assert_eq!(chapters[0].content, preface);
        assert_eq!(chapters[0].source_name, "Chapter 000 - Introduction.txt");
        assert_eq!(chapters[1].info.number, Some(1));
    }

    #[test]
    fn test_segment_shortPreface_shouldNotBecomeIntroduction() {
        let content = "short lead-in\nChapter 1\nbody";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].info.number, Some(1));
    }

    #[test]
    fn test_segment_longDigitRuns_shouldNotBeHeadings() {
        let content = "Chapter 123456 is not a heading\nplain text\nC123456\nmore text";
        let chapters = ChapterSegmenter::new().segment(
            &[RawFile::new("notes.txt", content)],
            SegmentMode::Single,
        );

        // No headings: Single mode turns the whole file into chapter 1.
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].info.number, Some(1));
        assert_eq!(chapters[0].info.name.as_deref(), Some("notes"));
        assert_eq!(chapters[0].info.status, ChapterStatus::Ok);
        assert!(chapters[0].info.message.is_some());
    }

    #[test]
    fn test_segment_multipleMode_shouldFallBackToFilenames() {
        let files = vec![
            RawFile::new("Chapter 5 - Test.txt", "no headings here"),
            RawFile::new("randomfile.txt", "no headings either"),
        ];
        let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

        assert_eq!(chapters.len(), 2);
        // Sorted: the recognized ordinal comes first, the unknown one last.
        assert_eq!(chapters[0].info.number, Some(5));
        assert_eq!(chapters[0].info.name.as_deref(), Some("Test"));
        assert_eq!(chapters[0].info.status, ChapterStatus::Ok);
        assert_eq!(chapters[1].info.number, None);
        assert_eq!(chapters[1].info.status, ChapterStatus::Warning);
        assert!(chapters[1].info.message.is_some());
    }

    #[test]
    fn test_segment_filenameFallback_shouldHandleBareNumberPattern() {
        let files = vec![RawFile::new("12 - Story_Name.txt", "content")];
        let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

        assert_eq!(chapters[0].info.number, Some(12));
        assert_eq!(chapters[0].info.name.as_deref(), Some("Story Name"));
    }

    #[test]
    fn test_segment_duplicatesAndGaps_shouldFlagAgainstLastUniqueOrdinal() {
        let content = "Chapter 1\none\nChapter 2\ntwo-a\nChapter 2\ntwo-b\nChapter 3\nthree\nChapter 4\nfour";
        let chapters = segment_one(content);

        let numbers: Vec<Option<u32>> = chapters.iter().map(|c| c.info.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(2), Some(3), Some(4)]);

        assert_eq!(chapters[0].info.status, ChapterStatus::Ok);
        // Both claimants of chapter 2 are flagged as duplicates.
        assert_eq!(chapters[1].info.status, ChapterStatus::Warning);
        assert!(chapters[1].info.message.as_deref().unwrap().contains("Duplicate"));
        assert_eq!(chapters[2].info.status, ChapterStatus::Warning);
        assert!(chapters[2].info.message.as_deref().unwrap().contains("Duplicate"));
        // Duplicates are excluded from gap tracking, so chapter 3 is measured
        // against chapter 1 and reports chapter 2 as missing.
        assert_eq!(chapters[3].info.status, ChapterStatus::Warning);
        assert_eq!(
            chapters[3].info.message.as_deref(),
            Some("Missing chapter 2.")
        );
        assert_eq!(chapters[4].info.status, ChapterStatus::Ok);
    }

    #[test]
    fn test_segment_gapRange_shouldCiteExactBounds() {
        let content = "Chapter 1\none\nChapter 5\nfive";
        let chapters = segment_one(content);

        assert_eq!(
            chapters[1].info.message.as_deref(),
            Some("Missing chapters 2 to 4.")
        );
    }

    #[test]
    fn test_segment_introductionChapter_shouldNotTriggerGap() {
        let preface = "This preface is long enough to become an introduction chapter on its own.";
        let content = format!("{}\nChapter 2\nbody two\nChapter 3\nbody three", preface);
        let chapters = segment_one(&content);

        assert_eq!(chapters[0].info.number, Some(0));
        assert_eq!(chapters[0].info.status, ChapterStatus::Ok);
        // Chapter 2 is measured against the preface's ordinal 0.
        assert_eq!(chapters[1].info.number, Some(2));
        assert_eq!(chapters[1].info.status, ChapterStatus::Warning);
        assert_eq!(
            chapters[1].info.message.as_deref(),
            Some("Missing chapter 1.")
        );
    }

    #[test]
    fn test_segment_crlfInput_shouldSplitCleanly() {
        let content = "Chapter 1\r\nbody one\r\nChapter 2\r\nbody two";
        let chapters = segment_one(content);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].content, "Chapter 1\nbody one");
        assert_eq!(chapters[1].content, "Chapter 2\nbody two");
    }

    #[test]
    fn test_segment_headingTitleDecoration_shouldBeStripped() {
        let content = "Chapter 7: **Bold Title**\nbody";
        let chapters = segment_one(content);

        assert_eq!(chapters[0].info.name.as_deref(), Some("**Bold Title"));
        // Leading separators are stripped; trailing markdown is stripped too.
        let content = "Chapter 8 - Plain Title...\nbody";
        let chapters = segment_one(content);
        assert_eq!(chapters[0].info.name.as_deref(), Some("Plain Title"));
    }

    #[test]
    fn test_segment_sortShouldOrderNullsLastByName() {
        let files = vec![
            RawFile::new("zeta.txt", "plain"),
            RawFile::new("alpha.txt", "plain"),
            RawFile::new("Chapter 2.txt", "plain"),
        ];
        let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

        assert_eq!(chapters[0].info.number, Some(2));
        assert_eq!(chapters[1].source_name, "alpha.txt");
        assert_eq!(chapters[2].source_name, "zeta.txt");
    }

    #[test]
    fn test_headingScanner_customKeywords_shouldBeUsed() {
        let segmenter = ChapterSegmenter::with_keywords(&["kapitel"]);
        let content = "Kapitel 2 - Anfang\ntext";
        let chapters = segmenter.segment(&[RawFile::new("b.txt", content)], SegmentMode::Single);

        assert_eq!(chapters[0].info.number, Some(2));
        assert_eq!(chapters[0].info.name.as_deref(), Some("Anfang"));
    }

    #[test]
    fn test_headingScanner_wordsContainingKeyword_shouldNotMatch() {
        // "church" starts with the bare "c" keyword but has no ordinal after it.
        let content = "church 5 miles away\nchanting continued";
        let chapters = segment_one(content);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].info.number, Some(1)); // whole-file fallback
    }
}
