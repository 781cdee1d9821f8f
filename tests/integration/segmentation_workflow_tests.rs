/*!
 * Integration tests for chapter segmentation over realistic inputs
 */

use yabtwai::chapter_segmenter::{ChapterSegmenter, ChapterStatus, RawFile, SegmentMode};

use crate::common::sample_book;

#[test]
fn test_segment_sampleBook_shouldYieldIntroductionAndChapters() {
    let segmenter = ChapterSegmenter::new();
    let chapters = segmenter.segment(
        &[RawFile::new("book.txt", sample_book())],
        SegmentMode::Single,
    );

    assert_eq!(chapters.len(), 4);
    assert_eq!(chapters[0].info.number, Some(0));
    assert_eq!(chapters[0].info.name.as_deref(), Some("Introduction"));
    assert_eq!(chapters[1].info.number, Some(1));
    assert_eq!(chapters[1].info.name.as_deref(), Some("Departure"));
    assert_eq!(chapters[3].info.number, Some(3));
    assert!(chapters.iter().all(|c| c.info.status == ChapterStatus::Ok));
}

#[test]
fn test_segment_headinglessFilenames_shouldUseFilenameHeuristics() {
    // The end-to-end fallback scenario: two files, no headings, multiple mode.
    let files = vec![
        RawFile::new("Chapter 5 - Test.txt", "plain content without any heading"),
        RawFile::new("randomfile.txt", "also without a heading"),
    ];
    let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

    assert_eq!(chapters.len(), 2);
    // Sorted order places the recognized ordinal first.
    assert_eq!(chapters[0].info.number, Some(5));
    assert_eq!(chapters[0].info.name.as_deref(), Some("Test"));
    assert_eq!(chapters[0].info.status, ChapterStatus::Ok);
    assert_eq!(chapters[1].info.number, None);
    assert_eq!(chapters[1].info.status, ChapterStatus::Warning);
}

#[test]
fn test_segment_mixedFiles_shouldMergeSortAndFlagAcrossFiles() {
    // One file with headings, one heading-less file claiming an ordinal via
    // its name, producing a combined, sorted, gap-checked sequence.
    let files = vec![
        RawFile::new(
            "part1.txt",
            "Chapter 1 - One\nbody one\nChapter 2 - Two\nbody two",
        ),
        RawFile::new("Chapter 6 - Six.txt", "body six, no heading inside"),
    ];
    let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

    let numbers: Vec<Option<u32>> = chapters.iter().map(|c| c.info.number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(6)]);
    assert_eq!(chapters[2].info.status, ChapterStatus::Warning);
    assert_eq!(
        chapters[2].info.message.as_deref(),
        Some("Missing chapters 3 to 5.")
    );
}

#[test]
fn test_segment_duplicateOrdinalsAcrossFiles_shouldFlagEveryClaimant() {
    let files = vec![
        RawFile::new("a.txt", "Chapter 2 - From A\nbody"),
        RawFile::new("b.txt", "Chapter 2 - From B\nbody"),
        RawFile::new("c.txt", "Chapter 1 - Fine\nbody\nChapter 3 - Also fine\nbody"),
    ];
    let chapters = ChapterSegmenter::new().segment(&files, SegmentMode::Multiple);

    let numbers: Vec<Option<u32>> = chapters.iter().map(|c| c.info.number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(2), Some(3)]);

    assert!(chapters[1].info.message.as_deref().unwrap().contains("Duplicate"));
    assert!(chapters[2].info.message.as_deref().unwrap().contains("Duplicate"));
    // Gap detection runs against chapter 1, the last uniquely-claimed ordinal.
    assert_eq!(
        chapters[3].info.message.as_deref(),
        Some("Missing chapter 2.")
    );
}
