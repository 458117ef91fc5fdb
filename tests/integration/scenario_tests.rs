/*!
 * End-to-end parsing scenarios, one per input dialect
 */

use scriptbreak::errors::ParseError;
use scriptbreak::glyph_source::StaticGlyphSource;
use scriptbreak::screenplay::model::{IntExt, ScreenplayFormat, TextFragment, UNTITLED};
use scriptbreak::screenplay::reconstructor::reconstruct_page;
use scriptbreak::screenplay::ScreenplayParser;

use crate::common::{init_test_logging, fdx_document, sample_page, sample_screenplay};

#[test]
fn test_parseText_twoSceneScript_shouldReturnBothScenes() {
    let input = "INT. KITCHEN - DAY\n\nBOB enters the room quietly.\n\nEXT. STREET - NIGHT\n\nBOB walks to his car.";

    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    assert_eq!(parsed.scenes.len(), 2);
    assert_eq!(parsed.scenes[0].number, 1);
    assert_eq!(parsed.scenes[0].header, "INT. KITCHEN - DAY");
    assert_eq!(parsed.scenes[0].content, "BOB enters the room quietly.");
    assert_eq!(parsed.scenes[1].number, 2);
    assert_eq!(parsed.scenes[1].header, "EXT. STREET - NIGHT");
    assert_eq!(parsed.scenes[1].content, "BOB walks to his car.");
    assert_eq!(parsed.title, UNTITLED);
    assert_eq!(parsed.metadata.format, ScreenplayFormat::Text);
}

#[test]
fn test_parseText_withLongFrontMatter_shouldDropItAndKeepTitle() {
    let front_matter = [
        "MIDNIGHT EXPRESSWAY",
        "",
        "an original screenplay",
        "",
        "Written by",
        "Jordan Vale",
        "",
        "Based on a true story",
        "",
        "Second Draft",
        "January 2024",
        "",
        "Represented by",
        "North Star Talent",
        "1200 Sunset Boulevard",
        "Los Angeles, CA",
        "jordan@example.com",
        "(310) 555-0142",
        "",
        "FADE IN:",
    ];
    assert_eq!(front_matter.len(), 20);

    let input = format!(
        "{}\nINT. TOLL BOOTH - NIGHT\nA lone attendant dozes under flickering light.\nHeadlights approach.\n\nEXT. HIGHWAY - CONTINUOUS\nA truck thunders past the booth.",
        front_matter.join("\n")
    );

    let parsed = ScreenplayParser::default().parse_text(&input).unwrap();

    assert_eq!(parsed.title, "MIDNIGHT EXPRESSWAY");
    assert_eq!(parsed.scenes.len(), 2);
    assert!(parsed.scenes[0]
        .content
        .starts_with("A lone attendant dozes under flickering light."));

    for scene in &parsed.scenes {
        for line in front_matter.iter().filter(|l| !l.is_empty()) {
            assert!(!scene.content.contains(line), "front matter leaked: {}", line);
            assert!(!scene.header.contains(line), "front matter leaked: {}", line);
        }
    }
}

#[test]
fn test_parseFdx_headingAndThreeActions_shouldJoinActions() {
    let xml = fdx_document(&[
        ("Scene Heading", "INT. LIGHTHOUSE - NIGHT"),
        ("Action", "The lamp turns slowly."),
        ("Action", "Waves break against the rocks."),
        ("Action", "A keeper climbs the stairs."),
    ]);

    let parsed = ScreenplayParser::default().parse_fdx(&xml).unwrap();

    assert_eq!(parsed.scenes.len(), 1);
    let scene = &parsed.scenes[0];
    assert_eq!(scene.number, 1);
    assert_eq!(scene.header, "INT. LIGHTHOUSE - NIGHT");
    assert_eq!(
        scene.content,
        "The lamp turns slowly.\nWaves break against the rocks.\nA keeper climbs the stairs."
    );
    assert_eq!(scene.header_parsed.int_ext, Some(IntExt::Interior));
    assert_eq!(parsed.title, "HARBOR LIGHTS");
    assert_eq!(parsed.metadata.format, ScreenplayFormat::Fdx);
}

#[test]
fn test_parseStr_withFdxContent_shouldRouteToXmlPath() {
    let xml = fdx_document(&[
        ("Scene Heading", "EXT. PIER - DAWN"),
        ("Action", "Fog rolls over the water."),
        ("Character", "MAYA"),
        ("Dialogue", "Anyone out there?"),
    ]);

    let parsed = ScreenplayParser::default().parse_str(&xml).unwrap();

    assert_eq!(parsed.metadata.format, ScreenplayFormat::Fdx);
    assert_eq!(
        parsed.scenes[0].content,
        "Fog rolls over the water.\nMAYA\nAnyone out there?"
    );
}

#[test]
fn test_parseFdx_withoutHeadings_shouldFail() {
    let xml = fdx_document(&[("Action", "Nothing but action here."), ("Action", "And more of it.")]);

    let result = ScreenplayParser::default().parse_fdx(&xml);

    assert_eq!(result.unwrap_err(), ParseError::XmlNoSceneHeadings);
}

#[test]
fn test_reconstructPage_withShuffledFragments_shouldMatchOrderedText() {
    let ordered = sample_page();

    let mut shuffled: Vec<TextFragment> = Vec::with_capacity(ordered.len());
    for index in [7, 2, 4, 0, 8, 5, 1, 3, 6] {
        shuffled.push(ordered[index].clone());
    }

    let expected = reconstruct_page(&ordered, 5.0);
    assert_eq!(reconstruct_page(&shuffled, 5.0), expected);
    assert!(expected.starts_with("1 INT. BASEMENT - NIGHT 1 \n"));
}

#[test]
fn test_parsePdf_withShuffledPage_shouldRecoverScenes() {
    init_test_logging();
    let mut page = sample_page();
    page.reverse();
    let source = StaticGlyphSource::new(vec![page]);

    let parsed = tokio_test::block_on(ScreenplayParser::default().parse_pdf(&source, b"%PDF-1.7")).unwrap();

    assert_eq!(parsed.metadata.format, ScreenplayFormat::Pdf);
    let summary: Vec<(u32, &str)> = parsed
        .scenes
        .iter()
        .map(|s| (s.number, s.header.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "INT. BASEMENT - NIGHT"), (2, "EXT. BACKYARD - DAY")]
    );
    assert_eq!(
        parsed.scenes[0].content,
        "A single bulb swings over a workbench.\nTools hang in careful rows."
    );
}

#[test]
fn test_parsePdf_withBlankPages_shouldReportMissingText() {
    let source = StaticGlyphSource::new(vec![Vec::new(), Vec::new()]);

    let error = tokio_test::block_on(ScreenplayParser::default().parse_pdf(&source, b"%PDF-1.7")).unwrap_err();

    assert!(matches!(error, ParseError::PdfNoExtractableText(_)));
    assert!(error.is_pdf_text_problem());
}

#[test]
fn test_parseText_sampleScreenplay_shouldKeepDialogueInScene() {
    let parsed = ScreenplayParser::default().parse_text(&sample_screenplay()).unwrap();

    assert_eq!(parsed.title, "THE NIGHT SHIFT");
    let headers: Vec<&str> = parsed.scenes.iter().map(|s| s.header.as_str()).collect();
    assert_eq!(
        headers,
        vec![
            "INT. DINER - NIGHT",
            "EXT. PARKING LOT - NIGHT",
            "INT. PICKUP TRUCK - CONTINUOUS"
        ]
    );
    assert!(parsed.scenes[0].content.ends_with("RITA\nKitchen closes in five."));
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_parseText_withoutHeaders_shouldFail() {
    let result = ScreenplayParser::default().parse_text("Just some notes about a film idea that never got written.");
    assert_eq!(result.unwrap_err(), ParseError::NoHeadersFound);
}
