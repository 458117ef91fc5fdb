/*!
 * Property tests for the screenplay parser
 */

use scriptbreak::app_config::ParserConfig;
use scriptbreak::screenplay::model::{ParseWarning, UNTITLED};
use scriptbreak::screenplay::normalizer::normalize;
use scriptbreak::screenplay::ScreenplayParser;

const LOCATIONS: [&str; 8] = [
    "KITCHEN", "STREET", "OFFICE", "ROOFTOP", "SUBWAY", "GARAGE", "BEACH", "LIBRARY",
];

fn numbered_free_script(count: usize) -> String {
    (0..count)
        .map(|i| {
            let keyword = if i % 2 == 0 { "INT." } else { "EXT." };
            format!(
                "{} {} - DAY\n\nSomething happens in scene {}.\n",
                keyword,
                LOCATIONS[i % LOCATIONS.len()],
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert a space between every character, as broken PDF extraction does
fn letter_spaced(text: &str) -> String {
    text.lines()
        .map(|line| line.chars().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_parseText_withNWellFormedScenes_shouldReturnNInOrder() {
    let parser = ScreenplayParser::default();

    for count in 1..=8 {
        let parsed = parser.parse_text(&numbered_free_script(count)).unwrap();

        assert_eq!(parsed.scenes.len(), count);
        for (i, scene) in parsed.scenes.iter().enumerate() {
            assert_eq!(scene.ordinal, i);
            assert!(scene.header.contains(LOCATIONS[i % LOCATIONS.len()]));
        }
    }
}

#[test]
fn test_parseText_withoutNumbers_shouldNumberMonotonically() {
    let parsed = ScreenplayParser::default().parse_text(&numbered_free_script(6)).unwrap();

    let numbers: Vec<u32> = parsed.scenes.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_normalize_shouldBeIdempotent() {
    let config = ParserConfig::default();
    let inputs = [
        numbered_free_script(3),
        letter_spaced("INT. KITCHEN - DAY\nBob cracks an egg."),
        "12 INT. HOUSE -\nNIGHT 12\r\n\r\n  Mara   waits.  \t".to_string(),
        "\u{feff}EXT. PIER\nDAWN\nGulls.".to_string(),
        "A  B  C  D".to_string(),
    ];

    for input in &inputs {
        let once = normalize(input, &config);
        assert_eq!(normalize(&once, &config), once, "input: {:?}", input);
    }
}

#[test]
fn test_parseText_withLetterSpacedInput_shouldRecoverHeader() {
    let input = letter_spaced("INT. KITCHEN - DAY\nBob cracks an egg into the pan.");
    let parsed = ScreenplayParser::default().parse_text(&input).unwrap();

    assert_eq!(parsed.scenes.len(), 1);
    assert_eq!(parsed.scenes[0].header, "INT. KITCHEN - DAY");
    assert_eq!(parsed.scenes[0].content, "Bob cracks an egg into the pan.");
}

#[test]
fn test_parseText_withDuplicateNumber_shouldKeepBothAndWarnOnce() {
    let input = "5 INT. HALL - DAY\nThe hall is quiet.\n\n5 EXT. GARDEN - DAY\nBirds sing loudly.\n\n6 INT. CELLAR - NIGHT\nWater drips slowly.";
    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    let numbers: Vec<u32> = parsed.scenes.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![5, 5, 6]);

    let duplicates: Vec<&ParseWarning> = parsed
        .warnings
        .iter()
        .filter(|w| matches!(w, ParseWarning::DuplicateSceneNumber { .. }))
        .collect();
    assert_eq!(
        duplicates,
        vec![&ParseWarning::DuplicateSceneNumber {
            number: 5,
            occurrences: 2
        }]
    );
}

#[test]
fn test_parseText_contentFloor_shouldDropTwoCharsAndKeepTwelve() {
    let input = "INT. A ROOM - DAY\nHi\n\nINT. B ROOM - DAY\ntwelve chars";
    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    assert_eq!(parsed.scenes.len(), 1);
    assert_eq!(parsed.scenes[0].content, "twelve chars");
    assert_eq!(parsed.scenes[0].number, 2);
}

#[test]
fn test_parseText_withTrailingNumberOnly_shouldUseIt() {
    let input = "INT. KITCHEN - DAY 14 14\nSteam rises from a pot.\n\nEXT. YARD - NIGHT\nCrickets fill the silence.";
    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    assert_eq!(parsed.scenes[0].number, 14);
    assert_eq!(parsed.scenes[0].header, "INT. KITCHEN - DAY");
    assert_eq!(parsed.scenes[0].original_header, "INT. KITCHEN - DAY 14 14");
    assert_eq!(parsed.scenes[1].number, 15);
}

#[test]
fn test_parseText_withWrappedHeader_shouldMergeIt() {
    let input = "INT. LONG CORRIDOR OF THE OLD HOSPITAL -\nNIGHT\nFootsteps echo in the dark.";
    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    assert_eq!(parsed.scenes.len(), 1);
    assert_eq!(
        parsed.scenes[0].header_parsed.time_of_day.as_deref(),
        Some("NIGHT")
    );
    assert_eq!(parsed.scenes[0].content, "Footsteps echo in the dark.");
}

#[test]
fn test_parseText_withHeaderVariants_shouldRecognizeEach() {
    let input = [
        "INT: LAB - DAY",
        "Beakers bubble on every shelf.",
        "EXT, CLIFF - DUSK",
        "Wind tears at the grass.",
        "I/E CAR - NIGHT",
        "Headlights sweep the road.",
        "BARN - EXT. MORNING",
        "A rooster crows twice.",
    ]
    .join("\n");

    let parsed = ScreenplayParser::default().parse_text(&input).unwrap();

    let headers: Vec<&str> = parsed.scenes.iter().map(|s| s.header.as_str()).collect();
    assert_eq!(
        headers,
        vec![
            "INT. LAB - DAY",
            "EXT. CLIFF - DUSK",
            "INT./EXT. CAR - NIGHT",
            "EXT. BARN - MORNING"
        ]
    );
}

#[test]
fn test_parseText_concurrentParses_shouldNotInterfere() {
    let first = "10 INT. BANK - DAY\nTellers count bills.\n\nINT. VAULT - DAY\nThe door swings open.";
    let second = numbered_free_script(4);

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| ScreenplayParser::default().parse_text(first).unwrap());
        let b = scope.spawn(|| ScreenplayParser::default().parse_text(&second).unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a.scenes.iter().map(|s| s.number).collect::<Vec<_>>(), vec![10, 11]);
    assert_eq!(b.scenes.iter().map(|s| s.number).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(a.title, UNTITLED);
}

#[test]
fn test_parseText_withHeaderLackingTime_shouldKeepTimeWordActionLine() {
    let input = "INT. KITCHEN\nLATER, Bob returns with the groceries.\n\nEXT. STREET - NIGHT\nRain falls on the empty road.";
    let parsed = ScreenplayParser::default().parse_text(input).unwrap();

    assert_eq!(parsed.scenes.len(), 2);
    assert_eq!(parsed.scenes[0].header, "INT. KITCHEN");
    assert_eq!(parsed.scenes[0].content, "LATER, Bob returns with the groceries.");
    assert!(!parsed
        .warnings
        .iter()
        .any(|w| matches!(w, ParseWarning::SceneDropped { .. })));
}
