//! End-to-end pipeline tests over generated PDF fixtures.
//!
//! PDFs are built in-process so the tests need no external binaries and no
//! checked-in fixtures.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use postlens::analysis::{ContentAnalyzer, SentimentScorer, SuggestionEngine, SuggestionSource};
use postlens::config::DEFAULT_MAX_FILE_SIZE;
use postlens::extract::{extract_from_pdf, TextExtractor};
use postlens::storage::UploadStore;
use postlens::validation::Validator;
use postlens::{AnalysisResult, Pipeline, PipelineError};

/// Build a PDF with one page of Courier text per entry in `pages`.
fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

fn pipeline_in(dir: &std::path::Path) -> Pipeline {
    Pipeline::with_parts(
        Validator::default(),
        UploadStore::new(dir, DEFAULT_MAX_FILE_SIZE).expect("upload store"),
        TextExtractor::default(),
        ContentAnalyzer::with_parts(
            SentimentScorer::heuristic_only(),
            SuggestionEngine::new(None),
        ),
    )
}

#[test]
fn multi_page_pdf_extracts_in_page_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("three-pages.pdf");
    std::fs::write(
        &path,
        pdf_bytes(&[
            "First page content here.",
            "Second page content here.",
            "Third page content here.",
        ]),
    )
    .unwrap();

    let text = extract_from_pdf(&path).unwrap();
    let first = text.find("First page").expect("first page text");
    let second = text.find("Second page").expect("second page text");
    let third = text.find("Third page").expect("third page text");
    assert!(first < second && second < third, "pages out of order: {}", text);
    assert!(text.contains("\n\n"), "pages not separated by a blank line");
}

#[tokio::test]
async fn pdf_upload_produces_full_analysis() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());
    let bytes = pdf_bytes(&[
        "Hello world, this is a test post about technology and innovation.",
    ]);

    let outcome = pipeline
        .process_upload(&bytes, "post.pdf")
        .await
        .expect("pipeline succeeds");

    match outcome.analysis {
        AnalysisResult::Complete {
            sentiment,
            readability,
            engagement_suggestions,
            ..
        } => {
            assert_eq!(sentiment.label.as_str(), "NEUTRAL");
            assert!(sentiment.error.is_none());

            assert_eq!(readability.word_count, 11);
            assert_eq!(readability.sentence_count, 1);
            assert!(readability.error.is_none());

            assert_eq!(
                engagement_suggestions.source,
                SuggestionSource::ContentAnalysis
            );
            assert!(engagement_suggestions
                .detected_topics
                .as_ref()
                .unwrap()
                .contains(&"technology".to_string()));
            assert!(engagement_suggestions
                .hashtag_suggestions
                .iter()
                .any(|t| t == "#tech"));
        }
        AnalysisResult::Failed { error, .. } => panic!("analysis failed: {}", error),
    }

    // The stored copy is gone once processing finishes.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn renamed_text_file_fails_validation() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());

    let err = pipeline
        .process_upload(b"just some plain text", "notes.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(err.to_string().contains("valid PDF"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn disallowed_extension_is_rejected_before_content_checks() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());

    let err = pipeline
        .process_upload(b"%PDF-1.4 but named wrong", "doc.docx")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid file type"));
}

#[tokio::test]
async fn pdf_with_too_little_text_is_insufficient() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());
    let bytes = pdf_bytes(&["hi"]);

    let err = pipeline.process_upload(&bytes, "tiny.pdf").await.unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientText));
    assert!(err.to_string().contains("sufficient text"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn blank_image_upload_yields_insufficient_text() {
    use postlens::config::OcrConfig;
    use postlens::extract::tesseract_available;

    if !tesseract_available(&OcrConfig::default()) {
        eprintln!("tesseract not installed, skipping OCR test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());

    let img = image::RgbImage::from_pixel(200, 100, image::Rgb([255, 255, 255]));
    let mut png = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut png),
        image::ImageFormat::Png,
    )
    .unwrap();

    let err = pipeline.process_upload(&png, "blank.png").await.unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientText));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn direct_text_analysis_matches_upload_analysis_shape() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_in(dir.path());

    let result = pipeline
        .analyze_text("Hello world, this is a test post about technology and innovation.")
        .await;
    match result {
        AnalysisResult::Complete {
            text_length,
            word_count,
            ..
        } => {
            assert_eq!(word_count, 11);
            assert_eq!(text_length, 65);
        }
        AnalysisResult::Failed { error, .. } => panic!("analysis failed: {}", error),
    }
}
