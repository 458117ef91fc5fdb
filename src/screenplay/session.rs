/*!
 * Line scanner for the plaintext and PDF paths.
 *
 * The scan is an explicit two-state machine. `BeforeFirstScene` ignores
 * lines until a header opens a scene; `InScene` accumulates body lines until
 * the next header or the end of input closes it. All mutable state of a
 * parse lives in a `ScanSession` that is created per call and consumed at
 * the end, so independent parses never share anything.
 */

use log::{debug, trace};

use super::matcher::match_header;
use super::model::Scene;
use super::numbering::{build_header, NumberResolver};

/// Scanner state
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    /// No header seen yet
    BeforeFirstScene,
    /// A scene is open and accumulating content
    InScene(Scene),
}

/// Per-parse scanner state: numbering plus the ordinal counter.
#[derive(Debug, Default)]
pub struct ScanSession {
    resolver: NumberResolver,
    next_ordinal: usize,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transition function: `(state, line) -> (state, closed scene?)`.
    pub fn step(&mut self, state: ScanState, line: &str) -> (ScanState, Option<Scene>) {
        if let Some(matched) = match_header(line) {
            let header = build_header(line, &matched, &mut self.resolver);
            trace!(
                "Header via {:?}: '{}' -> scene {}",
                matched.strategy, header.display, header.number
            );

            let opened = Scene::open(header, self.next_ordinal);
            self.next_ordinal += 1;

            let closed = match state {
                ScanState::InScene(scene) => Some(scene.finalize()),
                ScanState::BeforeFirstScene => None,
            };
            return (ScanState::InScene(opened), closed);
        }

        match state {
            ScanState::InScene(mut scene) => {
                scene.push_line(line);
                (ScanState::InScene(scene), None)
            }
            ScanState::BeforeFirstScene => {
                if !line.trim().is_empty() {
                    debug!("Ignoring line before first scene: {}", line.trim());
                }
                (ScanState::BeforeFirstScene, None)
            }
        }
    }

    /// Close whatever is open at end of input.
    pub fn finish(state: ScanState) -> Option<Scene> {
        match state {
            ScanState::InScene(scene) => Some(scene.finalize()),
            ScanState::BeforeFirstScene => None,
        }
    }

    /// Scan all lines, returning every scene in source order.
    pub fn run<'a, I>(mut self, lines: I) -> (Vec<Scene>, usize)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scenes = Vec::new();
        let mut state = ScanState::BeforeFirstScene;

        for line in lines {
            let (next, closed) = self.step(state, line);
            state = next;
            if let Some(scene) = closed {
                scenes.push(scene);
            }
        }

        if let Some(scene) = Self::finish(state) {
            scenes.push(scene);
        }

        (scenes, self.resolver.collisions())
    }
}
